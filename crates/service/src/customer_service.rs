use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use models::customer::{self, CustomerChanges, NewCustomer};
use models::payment::PaymentStatus;

use crate::errors::ServiceError;
use crate::store::Store;

/// List all customers, oldest first.
pub async fn list_customers(store: &dyn Store) -> Result<Vec<customer::Model>, ServiceError> {
    store.customers().find_all().await
}

/// Get a customer by id.
pub async fn get_customer(store: &dyn Store, id: Uuid) -> Result<Option<customer::Model>, ServiceError> {
    store.customers().find_by_id(id).await
}

/// Create a customer; the email must not belong to anyone else.
#[instrument(skip(store, input), fields(email = %input.email))]
pub async fn create_customer(store: &dyn Store, input: NewCustomer) -> Result<customer::Model, ServiceError> {
    input.validate()?;
    let email = customer::normalize_email(&input.email);
    if store.customers().find_by_email(&email).await?.is_some() {
        return Err(ServiceError::EmailInUse);
    }
    let created = store.customers().insert(input.into_model()).await?;
    info!(customer_id = %created.id, "customer_created");
    Ok(created)
}

/// Update present fields; `Ok(None)` when the customer does not exist.
#[instrument(skip(store, changes), fields(customer_id = %id))]
pub async fn update_customer(
    store: &dyn Store,
    id: Uuid,
    changes: CustomerChanges,
) -> Result<Option<customer::Model>, ServiceError> {
    let Some(mut current) = store.customers().find_by_id(id).await? else { return Ok(None) };
    changes.validate()?;
    if let Some(email) = changes.email.as_deref() {
        let email = customer::normalize_email(email);
        if email != current.email {
            if let Some(other) = store.customers().find_by_email(&email).await? {
                if other.id != id {
                    return Err(ServiceError::EmailInUse);
                }
            }
        }
    }
    changes.apply(&mut current);
    let updated = store.customers().update(current).await?;
    info!(customer_id = %updated.id, "customer_updated");
    Ok(Some(updated))
}

/// Delete a customer unless it still has pending payments.
/// Returns the affected row count (0 when the id is unknown).
#[instrument(skip(store), fields(customer_id = %id))]
pub async fn delete_customer(store: &dyn Store, id: Uuid) -> Result<u64, ServiceError> {
    let pending = store
        .payments()
        .count_by_customer_and_status(id, PaymentStatus::Pending)
        .await?;
    if pending > 0 {
        info!(pending, "customer_delete_blocked");
        return Err(ServiceError::HasActivePayments);
    }
    let affected = store.customers().delete(id).await?;
    if affected > 0 {
        info!("customer_deleted");
    }
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::{new_customer, seed_graph};

    #[tokio::test]
    async fn create_assigns_id_and_defaults() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("a@x.com")).await?;
        assert!(!c.id.is_nil());
        assert!(c.active);
        assert_eq!(get_customer(&store, c.id).await?, Some(c));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_write() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        create_customer(&store, new_customer("a@x.com")).await?;
        let res = create_customer(&store, new_customer("A@X.com")).await;
        assert!(matches!(res, Err(ServiceError::EmailInUse)));
        assert_eq!(list_customers(&store).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let mut input = new_customer("not-an-email");
        input.phone = String::new();
        let err = create_customer(&store, input).await.unwrap_err();
        assert_eq!(err.kind(), "validation-error");
        match err {
            ServiceError::Validation(errs) => {
                assert!(errs.errors().contains_key("email"));
                assert!(errs.errors().contains_key("phone"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.customers.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_checks_email_against_other_customers() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let a = create_customer(&store, new_customer("a@x.com")).await?;
        let b = create_customer(&store, new_customer("b@x.com")).await?;

        let taken = CustomerChanges { email: Some("a@x.com".into()), ..Default::default() };
        let res = update_customer(&store, b.id, taken).await;
        assert!(matches!(res, Err(ServiceError::EmailInUse)));
        assert_eq!(get_customer(&store, b.id).await?.map(|c| c.email), Some("b@x.com".into()));

        let unchanged = CustomerChanges { email: Some("a@x.com".into()), name: Some("Renamed".into()), ..Default::default() };
        let updated = update_customer(&store, a.id, unchanged).await?.expect("customer exists");
        assert_eq!(updated.name, "Renamed");

        let novel = CustomerChanges { email: Some("c@x.com".into()), ..Default::default() };
        let updated = update_customer(&store, b.id, novel).await?.expect("customer exists");
        assert_eq!(updated.email, "c@x.com");
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_omitted_fields_and_bumps_updated_at() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("a@x.com")).await?;
        let changes = CustomerChanges { active: Some(false), ..Default::default() };
        let updated = update_customer(&store, c.id, changes).await?.expect("customer exists");
        assert!(!updated.active);
        assert_eq!(updated.name, c.name);
        assert_eq!(updated.address, c.address);
        assert_eq!(updated.created_at, c.created_at);
        assert!(updated.updated_at >= c.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none_before_validation() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let invalid = CustomerChanges { email: Some("broken".into()), ..Default::default() };
        assert!(update_customer(&store, Uuid::new_v4(), invalid).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn pending_payment_blocks_delete() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let g = seed_graph(&store, PaymentStatus::Pending).await?;
        let res = delete_customer(&store, g.customer.id).await;
        assert!(matches!(res, Err(ServiceError::HasActivePayments)));
        assert!(get_customer(&store, g.customer.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn settled_payments_do_not_block_delete() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let g = seed_graph(&store, PaymentStatus::Paid).await?;
        assert_eq!(delete_customer(&store, g.customer.id).await?, 1);
        assert!(get_customer(&store, g.customer.id).await?.is_none());
        assert_eq!(delete_customer(&store, g.customer.id).await?, 0);
        Ok(())
    }
}
