//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access through the `store` traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every operation takes its store explicitly; there is no global handle.

pub mod errors;
pub mod store;
mod relations;
pub mod customer_service;
pub mod product_service;
pub mod session_service;
pub mod payment_service;
pub mod verification_service;
#[cfg(test)]
pub mod test_support;
