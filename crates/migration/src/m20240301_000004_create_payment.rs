//! Create `payment` table with FKs to `customer` and `product`.
//!
//! `paid_at` stays NULL until the payment is settled.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::CustomerId).not_null())
                    .col(uuid(Payment::ProductId).not_null())
                    .col(string_len(Payment::Amount, 32).not_null())
                    .col(string_len(Payment::Currency, 3).not_null())
                    .col(string_len(Payment::Method, 64).not_null())
                    .col(string_len(Payment::Status, 16).not_null())
                    .col(string_len(Payment::Reference, 255).not_null())
                    .col(
                        ColumnDef::new(Payment::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Payment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Payment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_customer")
                            .from(Payment::Table, Payment::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_product")
                            .from(Payment::Table, Payment::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    CustomerId,
    ProductId,
    Amount,
    Currency,
    Method,
    Status,
    Reference,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum Product { Table, Id }
