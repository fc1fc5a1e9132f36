//! Create `product` table with FK to `customer`.
//!
//! Rent bounds are stored as decimal text to keep precision across backends.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::CustomerId).not_null())
                    .col(string_len(Product::Name, 255).not_null())
                    .col(text(Product::Description).not_null())
                    .col(string_len(Product::MinMonthlyRent, 32).not_null())
                    .col(string_len(Product::MaxMonthlyRent, 32).not_null())
                    .col(boolean(Product::Active).not_null())
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Product::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_customer")
                            .from(Product::Table, Product::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    CustomerId,
    Name,
    Description,
    MinMonthlyRent,
    MaxMonthlyRent,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }
