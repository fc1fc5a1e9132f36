use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("customer not found")]
    CustomerNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("email already in use")]
    EmailInUse,
    #[error("customer has pending payments")]
    HasActivePayments,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    /// Stable machine-readable identifier for external mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation-error",
            ServiceError::CustomerNotFound => "customer-not-found",
            ServiceError::SessionNotFound => "session-not-found",
            ServiceError::PaymentNotFound => "payment-not-found",
            ServiceError::ProductNotFound => "product-not-found",
            ServiceError::EmailInUse => "email-in-use",
            ServiceError::HasActivePayments => "has-active-payments",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Db(_) => "unexpected-error",
        }
    }

    /// True for the foreign-key existence failures.
    pub fn is_missing_reference(&self) -> bool {
        matches!(
            self,
            ServiceError::CustomerNotFound
                | ServiceError::SessionNotFound
                | ServiceError::PaymentNotFound
                | ServiceError::ProductNotFound
        )
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ServiceError::Conflict(msg),
            _ => match e {
                DbErr::RecordNotUpdated => ServiceError::Conflict("record changed concurrently".into()),
                other => ServiceError::Db(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let all = [
            ServiceError::Validation(ValidationErrors::new()),
            ServiceError::CustomerNotFound,
            ServiceError::SessionNotFound,
            ServiceError::PaymentNotFound,
            ServiceError::ProductNotFound,
            ServiceError::EmailInUse,
            ServiceError::HasActivePayments,
            ServiceError::Conflict("x".into()),
            ServiceError::Db("x".into()),
        ];
        let mut kinds: Vec<_> = all.iter().map(ServiceError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), all.len());
    }

    #[test]
    fn missing_reference_covers_fk_kinds_only() {
        assert!(ServiceError::SessionNotFound.is_missing_reference());
        assert!(!ServiceError::EmailInUse.is_missing_reference());
        assert!(!ServiceError::Db("x".into()).is_missing_reference());
    }

    #[test]
    fn record_not_updated_maps_to_conflict() {
        let e: ServiceError = DbErr::RecordNotUpdated.into();
        assert_eq!(e.kind(), "conflict");
    }

    #[test]
    fn connection_errors_are_opaque() {
        let e: ServiceError = DbErr::Custom("boom".into()).into();
        assert_eq!(e.kind(), "unexpected-error");
    }
}
