use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use models::verification::{self, NewVerification, VerificationChanges};
use models::{customer, payment, session};

use crate::errors::ServiceError;
use crate::relations::{by_id, check_customer, check_payment, check_session, distinct_ids};
use crate::store::Store;

/// A verification with its customer, session and payment embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationView {
    #[serde(flatten)]
    pub verification: verification::Model,
    pub customer: Option<customer::Model>,
    pub session: Option<session::Model>,
    pub payment: Option<payment::Model>,
}

/// All verifications, newest first, each with its relations.
pub async fn list_verifications(store: &dyn Store) -> Result<Vec<VerificationView>, ServiceError> {
    let mut rows = store.verifications().find_all().await?;
    rows.reverse();
    let customer_ids = distinct_ids(rows.iter().map(|v| v.customer_id));
    let session_ids = distinct_ids(rows.iter().map(|v| v.session_id));
    let payment_ids = distinct_ids(rows.iter().map(|v| v.payment_id));
    let (customers, sessions, payments) = tokio::join!(
        store.customers().find_by_ids(&customer_ids),
        store.sessions().find_by_ids(&session_ids),
        store.payments().find_by_ids(&payment_ids),
    );
    let customers = by_id(customers?);
    let sessions = by_id(sessions?);
    let payments = by_id(payments?);
    Ok(rows
        .into_iter()
        .map(|verification| VerificationView {
            customer: customers.get(&verification.customer_id).cloned(),
            session: sessions.get(&verification.session_id).cloned(),
            payment: payments.get(&verification.payment_id).cloned(),
            verification,
        })
        .collect())
}

pub async fn get_verification(store: &dyn Store, id: Uuid) -> Result<Option<VerificationView>, ServiceError> {
    let Some(verification) = store.verifications().find_by_id(id).await? else { return Ok(None) };
    let (customer, session, payment) = tokio::join!(
        store.customers().find_by_id(verification.customer_id),
        store.sessions().find_by_id(verification.session_id),
        store.payments().find_by_id(verification.payment_id),
    );
    Ok(Some(VerificationView { customer: customer?, session: session?, payment: payment?, verification }))
}

#[instrument(skip(store, input), fields(customer_id = %input.customer_id))]
pub async fn create_verification(store: &dyn Store, input: NewVerification) -> Result<verification::Model, ServiceError> {
    input.validate()?;
    check_references(store, Some(input.customer_id), Some(input.session_id), Some(input.payment_id)).await?;
    let created = store.verifications().insert(input.into_model()).await?;
    info!(verification_id = %created.id, kind = %created.kind, "verification_created");
    Ok(created)
}

#[instrument(skip(store, changes), fields(verification_id = %id))]
pub async fn update_verification(
    store: &dyn Store,
    id: Uuid,
    changes: VerificationChanges,
) -> Result<Option<verification::Model>, ServiceError> {
    let Some(mut current) = store.verifications().find_by_id(id).await? else { return Ok(None) };
    changes.validate()?;
    check_references(store, changes.customer_id, changes.session_id, changes.payment_id).await?;
    changes.apply(&mut current);
    let updated = store.verifications().update(current).await?;
    info!(status = ?updated.status, "verification_updated");
    Ok(Some(updated))
}

#[instrument(skip(store), fields(verification_id = %id))]
pub async fn delete_verification(store: &dyn Store, id: Uuid) -> Result<u64, ServiceError> {
    let affected = store.verifications().delete(id).await?;
    if affected > 0 {
        info!("verification_deleted");
    }
    Ok(affected)
}

/// Lookups run concurrently; failures are reported as customer, then session, then payment.
async fn check_references(
    store: &dyn Store,
    customer_id: Option<Uuid>,
    session_id: Option<Uuid>,
    payment_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let (customer, session, payment) = tokio::join!(
        check_customer(store, customer_id),
        check_session(store, session_id),
        check_payment(store, payment_id),
    );
    customer?;
    session?;
    payment
}
