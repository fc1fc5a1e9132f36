#![cfg(test)]
use chrono::{Duration, Utc};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use models::customer::{self, NewCustomer};
use models::db::{connect_with_config, DatabaseConfig};
use models::payment::{self, NewPayment, PaymentStatus};
use models::product::{self, NewProduct};
use models::session::{self, NewSession};
use models::verification::NewVerification;

use crate::store::MemoryStore;
use crate::{customer_service, payment_service, product_service, session_service};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = configs_from_env();
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    connect_with_config(&cfg).await
}

fn configs_from_env() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_env();
    cfg.min_connections = 1;
    cfg
}

pub fn new_customer(email: &str) -> NewCustomer {
    NewCustomer {
        name: "Test Customer".into(),
        email: email.into(),
        phone: "555-0100".into(),
        address: "1 Test Street".into(),
        active: None,
    }
}

pub fn new_product(customer_id: Uuid) -> NewProduct {
    NewProduct {
        customer_id,
        name: "Desk".into(),
        description: "Hot desk".into(),
        min_monthly_rent: "100".into(),
        max_monthly_rent: "200".into(),
        active: None,
    }
}

pub fn new_session(customer_id: Uuid) -> NewSession {
    NewSession { customer_id, user_agent: "UA".into(), status: None, started_at: None, ended_at: None }
}

pub fn new_payment(customer_id: Uuid, product_id: Uuid, status: Option<PaymentStatus>) -> NewPayment {
    NewPayment {
        customer_id,
        product_id,
        amount: "150.00".into(),
        currency: "EUR".into(),
        method: "card".into(),
        status,
        reference: "ref-1".into(),
        paid_at: None,
    }
}

pub fn new_verification(customer_id: Uuid, session_id: Uuid, payment_id: Uuid) -> NewVerification {
    NewVerification {
        customer_id,
        session_id,
        payment_id,
        kind: "email".into(),
        status: None,
        attempts: None,
        expires_at: Utc::now() + Duration::hours(1),
        verified_at: None,
    }
}

/// Customer, product, session and a payment in `status`, all persisted.
pub struct Graph {
    pub customer: customer::Model,
    pub product: product::Model,
    pub session: session::Model,
    pub payment: payment::Model,
}

pub async fn seed_graph(store: &MemoryStore, status: PaymentStatus) -> Result<Graph, anyhow::Error> {
    let email = format!("graph_{}@example.com", Uuid::new_v4());
    let customer = customer_service::create_customer(store, new_customer(&email)).await?;
    let product = product_service::create_product(store, new_product(customer.id)).await?;
    let session = session_service::create_session(store, new_session(customer.id)).await?;
    let payment = payment_service::create_payment(store, new_payment(customer.id, product.id, Some(status))).await?;
    Ok(Graph { customer, product, session, payment })
}
