//! Create `session` table with FK to `customer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(uuid(Session::Id).primary_key())
                    .col(uuid(Session::CustomerId).not_null())
                    .col(string_len(Session::UserAgent, 512).not_null())
                    .col(string_len(Session::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Session::StartedAt).not_null())
                    .col(
                        ColumnDef::new(Session::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Session::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Session::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_customer")
                            .from(Session::Table, Session::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Session::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Session { Table, Id, CustomerId, UserAgent, Status, StartedAt, EndedAt, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Customer { Table, Id }
