use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use models::customer;
use models::product::{self, check_rent_bounds, NewProduct, ProductChanges};

use crate::errors::ServiceError;
use crate::relations::check_customer;
use crate::store::Store;

/// A product together with the customer offering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: product::Model,
    pub customer: Option<customer::Model>,
}

pub async fn list_products(store: &dyn Store) -> Result<Vec<product::Model>, ServiceError> {
    store.products().find_all().await
}

pub async fn get_product(store: &dyn Store, id: Uuid) -> Result<Option<ProductView>, ServiceError> {
    let Some(product) = store.products().find_by_id(id).await? else { return Ok(None) };
    let customer = store.customers().find_by_id(product.customer_id).await?;
    Ok(Some(ProductView { product, customer }))
}

#[instrument(skip(store, input), fields(customer_id = %input.customer_id))]
pub async fn create_product(store: &dyn Store, input: NewProduct) -> Result<product::Model, ServiceError> {
    input.validate()?;
    check_rent_bounds(&input.min_monthly_rent, &input.max_monthly_rent)?;
    check_customer(store, Some(input.customer_id)).await?;
    let created = store.products().insert(input.into_model()).await?;
    info!(product_id = %created.id, "product_created");
    Ok(created)
}

#[instrument(skip(store, changes), fields(product_id = %id))]
pub async fn update_product(
    store: &dyn Store,
    id: Uuid,
    changes: ProductChanges,
) -> Result<Option<product::Model>, ServiceError> {
    let Some(mut current) = store.products().find_by_id(id).await? else { return Ok(None) };
    changes.validate()?;
    let min = changes.min_monthly_rent.as_deref().unwrap_or(&current.min_monthly_rent);
    let max = changes.max_monthly_rent.as_deref().unwrap_or(&current.max_monthly_rent);
    check_rent_bounds(min, max)?;
    check_customer(store, changes.customer_id).await?;
    changes.apply(&mut current);
    let updated = store.products().update(current).await?;
    info!("product_updated");
    Ok(Some(updated))
}

#[instrument(skip(store), fields(product_id = %id))]
pub async fn delete_product(store: &dyn Store, id: Uuid) -> Result<u64, ServiceError> {
    let affected = store.products().delete(id).await?;
    if affected > 0 {
        info!("product_deleted");
    }
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service::create_customer;
    use crate::store::MemoryStore;
    use crate::test_support::{new_customer, new_product};

    #[tokio::test]
    async fn create_requires_existing_customer() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let res = create_product(&store, new_product(Uuid::new_v4())).await;
        assert!(matches!(res, Err(ServiceError::CustomerNotFound)));
        assert!(store.products.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_embeds_owning_customer() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("p@x.com")).await?;
        let p = create_product(&store, new_product(c.id)).await?;
        assert!(p.active);
        let view = get_product(&store, p.id).await?.expect("product exists");
        assert_eq!(view.product, p);
        assert_eq!(view.customer, Some(c));

        let json = serde_json::to_value(&view)?;
        assert_eq!(json["id"], serde_json::json!(p.id));
        assert_eq!(json["customer"]["email"], "p@x.com");
        Ok(())
    }

    #[tokio::test]
    async fn rent_bounds_are_checked_against_merged_values() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("r@x.com")).await?;
        let mut input = new_product(c.id);
        input.min_monthly_rent = "300".into();
        assert!(matches!(create_product(&store, input).await, Err(ServiceError::Validation(_))));

        let p = create_product(&store, new_product(c.id)).await?;
        let too_high = ProductChanges { min_monthly_rent: Some("250".into()), ..Default::default() };
        assert!(matches!(update_product(&store, p.id, too_high).await, Err(ServiceError::Validation(_))));

        let widened = ProductChanges {
            min_monthly_rent: Some("250".into()),
            max_monthly_rent: Some("400".into()),
            ..Default::default()
        };
        let updated = update_product(&store, p.id, widened).await?.expect("product exists");
        assert_eq!(updated.min_monthly_rent, "250");
        assert_eq!(updated.description, p.description);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_unknown_customer_reference() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("u@x.com")).await?;
        let p = create_product(&store, new_product(c.id)).await?;
        let changes = ProductChanges { customer_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(matches!(update_product(&store, p.id, changes).await, Err(ServiceError::CustomerNotFound)));
        assert_eq!(get_product(&store, p.id).await?.map(|v| v.product.customer_id), Some(c.id));
        Ok(())
    }

    #[tokio::test]
    async fn delete_then_get_is_absent() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new();
        let c = create_customer(&store, new_customer("d@x.com")).await?;
        let p = create_product(&store, new_product(c.id)).await?;
        assert_eq!(delete_product(&store, p.id).await?, 1);
        assert!(get_product(&store, p.id).await?.is_none());
        assert_eq!(delete_product(&store, p.id).await?, 0);
        Ok(())
    }
}
