use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use service::errors::ServiceError;

use crate::observability::SERVICE_ERRORS_TOTAL;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, kind: &'static str, error: impl Into<String>, details: Option<Value>) -> Self {
        Self { status, body: ErrorBody { error: error.into(), kind, details } }
    }

    /// The primary target of a get/update/delete does not exist.
    pub fn not_found(resource: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "record-not-found", format!("{resource} not found"), None)
    }

    pub(crate) fn invalid_body(details: String) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation-error", "Validation Error", Some(Value::String(details)))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let kind = e.kind();
        SERVICE_ERRORS_TOTAL.with_label_values(&[kind]).inc();
        match e {
            ServiceError::Validation(errs) => {
                let details = serde_json::to_value(&errs).ok();
                Self::new(StatusCode::BAD_REQUEST, kind, "Validation Error", details)
            }
            ref missing if missing.is_missing_reference() => {
                Self::new(StatusCode::BAD_REQUEST, kind, missing.to_string(), None)
            }
            ServiceError::EmailInUse | ServiceError::HasActivePayments => {
                Self::new(StatusCode::CONFLICT, kind, e.to_string(), None)
            }
            ServiceError::Conflict(detail) => {
                warn!(%detail, "write rejected by constraint");
                Self::new(StatusCode::CONFLICT, kind, "Conflict", None)
            }
            other => {
                error!(err = %other, "unexpected service failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, kind, "Internal Server Error", None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_body(rejection.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_body(rejection.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Validation(validator::ValidationErrors::new()), StatusCode::BAD_REQUEST),
            (ServiceError::CustomerNotFound, StatusCode::BAD_REQUEST),
            (ServiceError::ProductNotFound, StatusCode::BAD_REQUEST),
            (ServiceError::EmailInUse, StatusCode::CONFLICT),
            (ServiceError::HasActivePayments, StatusCode::CONFLICT),
            (ServiceError::Conflict("fk".into()), StatusCode::CONFLICT),
            (ServiceError::Db("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let kind = err.kind();
            let api: JsonApiError = err.into();
            assert_eq!(api.status, status, "{kind}");
            assert_eq!(api.body.kind, kind);
        }
    }

    #[test]
    fn unexpected_errors_do_not_leak_detail() {
        let api: JsonApiError = ServiceError::Db("password=hunter2".into()).into();
        assert!(!api.body.error.contains("hunter2"));
        assert!(api.body.details.is_none());
    }
}
