//! In-process store backed by hash maps.
//!
//! Used by tests and local demos. Referential actions (cascades) and unique
//! indexes are not emulated; the service layer's checks are the only guard.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use models::payment::PaymentStatus;
use models::{customer, payment, product, session, verification};

use super::{CustomerRepository, PaymentRepository, Record, Repository, Store};
use crate::errors::ServiceError;

pub struct MemoryTable<M> {
    rows: RwLock<HashMap<Uuid, M>>,
}

impl<M> Default for MemoryTable<M> {
    fn default() -> Self {
        Self { rows: RwLock::new(HashMap::new()) }
    }
}

impl<M: Record> MemoryTable<M> {
    fn read<T>(&self, f: impl FnOnce(&HashMap<Uuid, M>) -> T) -> T {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        f(&rows)
    }

    fn write<T>(&self, f: impl FnOnce(&mut HashMap<Uuid, M>) -> T) -> T {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut rows)
    }

    pub fn len(&self) -> usize {
        self.read(HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<M: Record> Repository<M> for MemoryTable<M> {
    async fn find_all(&self) -> Result<Vec<M>, ServiceError> {
        let mut all: Vec<M> = self.read(|rows| rows.values().cloned().collect());
        all.sort_by(|a, b| a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(&b.id())));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<M>, ServiceError> {
        Ok(self.read(|rows| rows.get(&id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<M>, ServiceError> {
        Ok(self.read(|rows| ids.iter().filter_map(|id| rows.get(id).cloned()).collect()))
    }

    async fn insert(&self, model: M) -> Result<M, ServiceError> {
        self.write(|rows| {
            if rows.contains_key(&model.id()) {
                return Err(ServiceError::Conflict(format!("duplicate primary key {}", model.id())));
            }
            rows.insert(model.id(), model.clone());
            Ok(model)
        })
    }

    async fn update(&self, model: M) -> Result<M, ServiceError> {
        self.write(|rows| match rows.get_mut(&model.id()) {
            Some(slot) => {
                *slot = model.clone();
                Ok(model)
            }
            None => Err(ServiceError::Conflict("record changed concurrently".into())),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
        Ok(self.write(|rows| u64::from(rows.remove(&id).is_some())))
    }
}

#[async_trait]
impl CustomerRepository for MemoryTable<customer::Model> {
    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
        Ok(self.read(|rows| rows.values().find(|c| c.email == email).cloned()))
    }
}

#[async_trait]
impl PaymentRepository for MemoryTable<payment::Model> {
    async fn count_by_customer_and_status(&self, customer_id: Uuid, status: PaymentStatus) -> Result<u64, ServiceError> {
        let n = self.read(|rows| {
            rows.values()
                .filter(|p| p.customer_id == customer_id && p.status == status)
                .count()
        });
        Ok(n as u64)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub customers: MemoryTable<customer::Model>,
    pub products: MemoryTable<product::Model>,
    pub sessions: MemoryTable<session::Model>,
    pub payments: MemoryTable<payment::Model>,
    pub verifications: MemoryTable<verification::Model>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn customers(&self) -> &dyn CustomerRepository { &self.customers }
    fn products(&self) -> &dyn Repository<product::Model> { &self.products }
    fn sessions(&self) -> &dyn Repository<session::Model> { &self.sessions }
    fn payments(&self) -> &dyn PaymentRepository { &self.payments }
    fn verifications(&self) -> &dyn Repository<verification::Model> { &self.verifications }
}
