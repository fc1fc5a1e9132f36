use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use models::customer;
use models::session::{self, NewSession, SessionChanges};

use crate::errors::ServiceError;
use crate::relations::check_customer;
use crate::store::Store;

/// A session together with the customer it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: session::Model,
    pub customer: Option<customer::Model>,
}

pub async fn list_sessions(store: &dyn Store) -> Result<Vec<session::Model>, ServiceError> {
    store.sessions().find_all().await
}

pub async fn get_session(store: &dyn Store, id: Uuid) -> Result<Option<SessionView>, ServiceError> {
    let Some(session) = store.sessions().find_by_id(id).await? else { return Ok(None) };
    let customer = store.customers().find_by_id(session.customer_id).await?;
    Ok(Some(SessionView { session, customer }))
}

/// `status` defaults to active and `started_at` to now.
#[instrument(skip(store, input), fields(customer_id = %input.customer_id))]
pub async fn create_session(store: &dyn Store, input: NewSession) -> Result<session::Model, ServiceError> {
    input.validate()?;
    check_customer(store, Some(input.customer_id)).await?;
    let created = store.sessions().insert(input.into_model()).await?;
    info!(session_id = %created.id, "session_created");
    Ok(created)
}

#[instrument(skip(store, changes), fields(session_id = %id))]
pub async fn update_session(
    store: &dyn Store,
    id: Uuid,
    changes: SessionChanges,
) -> Result<Option<session::Model>, ServiceError> {
    let Some(mut current) = store.sessions().find_by_id(id).await? else { return Ok(None) };
    changes.validate()?;
    check_customer(store, changes.customer_id).await?;
    changes.apply(&mut current);
    let updated = store.sessions().update(current).await?;
    info!(status = ?updated.status, "session_updated");
    Ok(Some(updated))
}

#[instrument(skip(store), fields(session_id = %id))]
pub async fn delete_session(store: &dyn Store, id: Uuid) -> Result<u64, ServiceError> {
    let affected = store.sessions().delete(id).await?;
    if affected > 0 {
        info!("session_deleted");
    }
    Ok(affected)
}
