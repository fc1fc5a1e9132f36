use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use models::payment::{self, NewPayment, PaymentChanges};
use models::{customer, product};

use crate::errors::ServiceError;
use crate::relations::{by_id, check_customer, check_product, distinct_ids};
use crate::store::Store;

/// A payment with its customer and product embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: payment::Model,
    pub customer: Option<customer::Model>,
    pub product: Option<product::Model>,
}

/// All payments, oldest first, each with its relations.
pub async fn list_payments(store: &dyn Store) -> Result<Vec<PaymentView>, ServiceError> {
    let payments = store.payments().find_all().await?;
    let customer_ids = distinct_ids(payments.iter().map(|p| p.customer_id));
    let product_ids = distinct_ids(payments.iter().map(|p| p.product_id));
    let (customers, products) = tokio::join!(
        store.customers().find_by_ids(&customer_ids),
        store.products().find_by_ids(&product_ids),
    );
    let customers = by_id(customers?);
    let products = by_id(products?);
    Ok(payments
        .into_iter()
        .map(|payment| PaymentView {
            customer: customers.get(&payment.customer_id).cloned(),
            product: products.get(&payment.product_id).cloned(),
            payment,
        })
        .collect())
}

pub async fn get_payment(store: &dyn Store, id: Uuid) -> Result<Option<PaymentView>, ServiceError> {
    let Some(payment) = store.payments().find_by_id(id).await? else { return Ok(None) };
    let (customer, product) = tokio::join!(
        store.customers().find_by_id(payment.customer_id),
        store.products().find_by_id(payment.product_id),
    );
    Ok(Some(PaymentView { customer: customer?, product: product?, payment }))
}

/// Both references are looked up concurrently; a missing customer is reported before a missing product.
#[instrument(skip(store, input), fields(customer_id = %input.customer_id, product_id = %input.product_id))]
pub async fn create_payment(store: &dyn Store, input: NewPayment) -> Result<payment::Model, ServiceError> {
    input.validate()?;
    check_references(store, Some(input.customer_id), Some(input.product_id)).await?;
    let created = store.payments().insert(input.into_model()).await?;
    info!(payment_id = %created.id, status = ?created.status, "payment_created");
    Ok(created)
}

#[instrument(skip(store, changes), fields(payment_id = %id))]
pub async fn update_payment(
    store: &dyn Store,
    id: Uuid,
    changes: PaymentChanges,
) -> Result<Option<payment::Model>, ServiceError> {
    let Some(mut current) = store.payments().find_by_id(id).await? else { return Ok(None) };
    changes.validate()?;
    check_references(store, changes.customer_id, changes.product_id).await?;
    changes.apply(&mut current);
    let updated = store.payments().update(current).await?;
    info!(status = ?updated.status, "payment_updated");
    Ok(Some(updated))
}

#[instrument(skip(store), fields(payment_id = %id))]
pub async fn delete_payment(store: &dyn Store, id: Uuid) -> Result<u64, ServiceError> {
    let affected = store.payments().delete(id).await?;
    if affected > 0 {
        info!("payment_deleted");
    }
    Ok(affected)
}

async fn check_references(store: &dyn Store, customer_id: Option<Uuid>, product_id: Option<Uuid>) -> Result<(), ServiceError> {
    let (customer, product) = tokio::join!(check_customer(store, customer_id), check_product(store, product_id));
    customer?;
    product
}
