//! Foreign-key existence checks and relation loading shared by the services.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::errors::ServiceError;
use crate::store::{Record, Store};

/// `None` means the field is absent from an update payload and needs no check.
pub(crate) async fn check_customer(store: &dyn Store, id: Option<Uuid>) -> Result<(), ServiceError> {
    let Some(id) = id else { return Ok(()) };
    match store.customers().find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::CustomerNotFound),
    }
}

pub(crate) async fn check_session(store: &dyn Store, id: Option<Uuid>) -> Result<(), ServiceError> {
    let Some(id) = id else { return Ok(()) };
    match store.sessions().find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::SessionNotFound),
    }
}

pub(crate) async fn check_payment(store: &dyn Store, id: Option<Uuid>) -> Result<(), ServiceError> {
    let Some(id) = id else { return Ok(()) };
    match store.payments().find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::PaymentNotFound),
    }
}

pub(crate) async fn check_product(store: &dyn Store, id: Option<Uuid>) -> Result<(), ServiceError> {
    let Some(id) = id else { return Ok(()) };
    match store.products().find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::ProductNotFound),
    }
}

/// Distinct ids in first-seen order.
pub(crate) fn distinct_ids(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn by_id<M: Record>(rows: Vec<M>) -> HashMap<Uuid, M> {
    rows.into_iter().map(|m| (m.id(), m)).collect()
}
