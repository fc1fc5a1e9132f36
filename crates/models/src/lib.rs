//! Entities, status enumerations and write payloads for the customer,
//! product, session, payment and verification tables.

pub mod db;
pub mod validation;
pub mod serde_ext;
pub mod customer;
pub mod product;
pub mod session;
pub mod payment;
pub mod verification;

#[cfg(test)]
mod tests;
