use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Payment: the customer delete guard filters on (customer_id, status)
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_customer_status")
                    .table(Payment::Table)
                    .col(Payment::CustomerId)
                    .col(Payment::Status)
                    .to_owned(),
            )
            .await?;

        // Verification: listed newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_verification_created_at")
                    .table(Verification::Table)
                    .col(Verification::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_customer")
                    .table(Session::Table)
                    .col(Session::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_customer")
                    .table(Product::Table)
                    .col(Product::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_customer").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_customer").table(Session::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_verification_created_at").table(Verification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_customer_status").table(Payment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payment { Table, CustomerId, Status }

#[derive(DeriveIden)]
enum Verification { Table, CreatedAt }

#[derive(DeriveIden)]
enum Session { Table, CustomerId }

#[derive(DeriveIden)]
enum Product { Table, CustomerId }
