//! Create `customer` table.
//!
//! Root entity; every other table references it. Email is unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::Name, 255).not_null())
                    .col(string_len(Customer::Email, 255).unique_key().not_null())
                    .col(string_len(Customer::Phone, 32).not_null())
                    .col(string_len(Customer::Address, 512).not_null())
                    .col(boolean(Customer::Active).not_null())
                    .col(timestamp_with_time_zone(Customer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customer::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Id, Name, Email, Phone, Address, Active, CreatedAt, UpdatedAt }
