//! SeaORM-backed store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use models::payment::PaymentStatus;
use models::{customer, payment, product, session, verification};

use super::{CustomerRepository, PaymentRepository, Repository, Store};
use crate::errors::ServiceError;

/// The only unique column besides the primary key is `customer.email`.
fn customer_write_err(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::EmailInUse,
        _ => e.into(),
    }
}

macro_rules! seaorm_repository {
    ($repo:ident, $module:ident, $write_err:path) => {
        #[derive(Clone)]
        pub struct $repo {
            db: DatabaseConnection,
        }

        #[async_trait]
        impl Repository<$module::Model> for $repo {
            async fn find_all(&self) -> Result<Vec<$module::Model>, ServiceError> {
                Ok($module::Entity::find()
                    .order_by_asc($module::Column::CreatedAt)
                    .order_by_asc($module::Column::Id)
                    .all(&self.db)
                    .await?)
            }

            async fn find_by_id(&self, id: Uuid) -> Result<Option<$module::Model>, ServiceError> {
                Ok($module::Entity::find_by_id(id).one(&self.db).await?)
            }

            async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<$module::Model>, ServiceError> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                Ok($module::Entity::find()
                    .filter($module::Column::Id.is_in(ids.iter().copied()))
                    .all(&self.db)
                    .await?)
            }

            async fn insert(&self, model: $module::Model) -> Result<$module::Model, ServiceError> {
                model.into_active_model().reset_all().insert(&self.db).await.map_err($write_err)
            }

            async fn update(&self, model: $module::Model) -> Result<$module::Model, ServiceError> {
                model.into_active_model().reset_all().update(&self.db).await.map_err($write_err)
            }

            async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
                let res = $module::Entity::delete_by_id(id).exec(&self.db).await?;
                Ok(res.rows_affected)
            }
        }
    };
}

seaorm_repository!(SeaOrmCustomers, customer, customer_write_err);
seaorm_repository!(SeaOrmProducts, product, ServiceError::from);
seaorm_repository!(SeaOrmSessions, session, ServiceError::from);
seaorm_repository!(SeaOrmPayments, payment, ServiceError::from);
seaorm_repository!(SeaOrmVerifications, verification, ServiceError::from);

#[async_trait]
impl CustomerRepository for SeaOrmCustomers {
    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
        Ok(customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPayments {
    async fn count_by_customer_and_status(&self, customer_id: Uuid, status: PaymentStatus) -> Result<u64, ServiceError> {
        Ok(payment::Entity::find()
            .filter(payment::Column::CustomerId.eq(customer_id))
            .filter(payment::Column::Status.eq(status))
            .count(&self.db)
            .await?)
    }
}

/// Store over one pooled connection; repositories share the pool.
#[derive(Clone)]
pub struct SeaOrmStore {
    customers: SeaOrmCustomers,
    products: SeaOrmProducts,
    sessions: SeaOrmSessions,
    payments: SeaOrmPayments,
    verifications: SeaOrmVerifications,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            customers: SeaOrmCustomers { db: db.clone() },
            products: SeaOrmProducts { db: db.clone() },
            sessions: SeaOrmSessions { db: db.clone() },
            payments: SeaOrmPayments { db: db.clone() },
            verifications: SeaOrmVerifications { db },
        }
    }
}

impl Store for SeaOrmStore {
    fn customers(&self) -> &dyn CustomerRepository { &self.customers }
    fn products(&self) -> &dyn Repository<product::Model> { &self.products }
    fn sessions(&self) -> &dyn Repository<session::Model> { &self.sessions }
    fn payments(&self) -> &dyn PaymentRepository { &self.payments }
    fn verifications(&self) -> &dyn Repository<verification::Model> { &self.verifications }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service;
    use crate::errors::ServiceError;
    use crate::test_support::{get_db, new_customer};

    #[tokio::test]
    async fn seaorm_store_customer_crud() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() { return Ok(()); }
        let store = SeaOrmStore::new(get_db().await?);

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let c = customer_service::create_customer(&store, new_customer(&email)).await?;
        assert!(c.active);

        let dup = customer_service::create_customer(&store, new_customer(&email)).await;
        assert!(matches!(dup, Err(ServiceError::EmailInUse)));

        // Bypassing the service check still surfaces the unique index as email-in-use
        let raw = store.customers().insert(new_customer(&email).into_model()).await;
        assert!(matches!(raw, Err(ServiceError::EmailInUse)));

        let found = store.customers().find_by_email(&email).await?;
        assert_eq!(found.map(|m| m.id), Some(c.id));

        assert_eq!(customer_service::delete_customer(&store, c.id).await?, 1);
        assert_eq!(customer_service::delete_customer(&store, c.id).await?, 0);
        Ok(())
    }
}
