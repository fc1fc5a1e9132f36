//! Create `verification` table with FKs to `customer`, `session` and `payment`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Verification::Table)
                    .if_not_exists()
                    .col(uuid(Verification::Id).primary_key())
                    .col(uuid(Verification::CustomerId).not_null())
                    .col(uuid(Verification::SessionId).not_null())
                    .col(uuid(Verification::PaymentId).not_null())
                    .col(string_len(Verification::Type, 64).not_null())
                    .col(string_len(Verification::Status, 16).not_null())
                    .col(integer(Verification::Attempts).not_null().default(0))
                    .col(timestamp_with_time_zone(Verification::ExpiresAt).not_null())
                    .col(
                        ColumnDef::new(Verification::VerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Verification::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Verification::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verification_customer")
                            .from(Verification::Table, Verification::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verification_session")
                            .from(Verification::Table, Verification::SessionId)
                            .to(Session::Table, Session::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verification_payment")
                            .from(Verification::Table, Verification::PaymentId)
                            .to(Payment::Table, Payment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Verification::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Verification {
    Table,
    Id,
    CustomerId,
    SessionId,
    PaymentId,
    Type,
    Status,
    Attempts,
    ExpiresAt,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum Session { Table, Id }

#[derive(DeriveIden)]
enum Payment { Table, Id }
