//! Persistence abstraction consumed by the service operations.
//!
//! The services only speak the verbs below (find-all, find-by-id,
//! find-by-predicate, insert, update, delete, count-by-predicate), so any
//! backend implementing [`Store`] can sit underneath them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use models::payment::PaymentStatus;
use models::{customer, payment, product, session, verification};

use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;

/// Common accessors over the five record types.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_record {
    ($($module:ident),+) => {
        $(
            impl Record for $module::Model {
                fn id(&self) -> Uuid { self.id }
                fn created_at(&self) -> DateTime<Utc> { self.created_at }
            }
        )+
    };
}

impl_record!(customer, product, session, payment, verification);

/// Generic repository verbs shared by every entity.
#[async_trait]
pub trait Repository<M: Record>: Send + Sync {
    /// All rows, oldest first.
    async fn find_all(&self) -> Result<Vec<M>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<M>, ServiceError>;
    /// Rows whose id is in `ids`; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<M>, ServiceError>;
    async fn insert(&self, model: M) -> Result<M, ServiceError>;
    async fn update(&self, model: M) -> Result<M, ServiceError>;
    /// Affected row count: 0 when the id was unknown, 1 otherwise.
    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError>;
}

#[async_trait]
pub trait CustomerRepository: Repository<customer::Model> {
    /// Lookup by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError>;
}

#[async_trait]
pub trait PaymentRepository: Repository<payment::Model> {
    async fn count_by_customer_and_status(&self, customer_id: Uuid, status: PaymentStatus) -> Result<u64, ServiceError>;
}

/// Handle to every repository; passed explicitly into each service call.
pub trait Store: Send + Sync {
    fn customers(&self) -> &dyn CustomerRepository;
    fn products(&self) -> &dyn Repository<product::Model>;
    fn sessions(&self) -> &dyn Repository<session::Model>;
    fn payments(&self) -> &dyn PaymentRepository;
    fn verifications(&self) -> &dyn Repository<verification::Model>;
}
