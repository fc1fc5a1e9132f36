use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

use crate::db::connect;
use crate::{customer, payment, product};

fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

/// Customer -> product -> payment round trip, then cascade on customer delete.
#[tokio::test]
async fn test_entity_round_trip() -> Result<()> {
    if !db_tests_enabled() {
        return Ok(());
    }
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;

    let c: customer::NewCustomer = serde_json::from_value(json!({
        "name": "Schema Test",
        "email": format!("schema_{}@example.com", Uuid::new_v4()),
        "phone": "555",
        "address": "Somewhere 1"
    }))?;
    let c = c.into_model().into_active_model().reset_all().insert(&db).await?;

    let p: product::NewProduct = serde_json::from_value(json!({
        "customer_id": c.id,
        "name": "Desk",
        "description": "Hot desk",
        "min_monthly_rent": "100",
        "max_monthly_rent": "200"
    }))?;
    let p = p.into_model().into_active_model().reset_all().insert(&db).await?;

    let pay: payment::NewPayment = serde_json::from_value(json!({
        "customer_id": c.id,
        "product_id": p.id,
        "amount": "150.00",
        "currency": "EUR",
        "method": "card",
        "reference": "ref-1"
    }))?;
    let pay = pay.into_model().into_active_model().reset_all().insert(&db).await?;

    let found = payment::Entity::find_by_id(pay.id).one(&db).await?;
    assert_eq!(found.map(|m| m.status), Some(payment::PaymentStatus::Pending));

    let pending = payment::Entity::find()
        .filter(payment::Column::CustomerId.eq(c.id))
        .filter(payment::Column::Status.eq(payment::PaymentStatus::Pending))
        .count(&db)
        .await?;
    assert_eq!(pending, 1);

    customer::Entity::delete_by_id(c.id).exec(&db).await?;
    assert!(product::Entity::find_by_id(p.id).one(&db).await?.is_none());
    assert!(payment::Entity::find_by_id(pay.id).one(&db).await?.is_none());
    Ok(())
}
