//! Extractors whose rejections use the JSON error body instead of axum's plain text.

use std::future::Future;

use axum::extract::{FromRequest, FromRequestParts};
use serde::de::DeserializeOwned;

use service::errors::ServiceError;

use crate::errors::JsonApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(JsonApiError))]
pub struct ApiPath<T>(pub T);

/// Decode an update body. When decoding fails, `target_exists` decides
/// between 404 (unknown id) and 400 (bad body), so an unknown id always
/// answers 404 whatever the body holds.
pub async fn parse_changes<T, F>(body: &[u8], target_exists: F, resource: &str) -> Result<T, JsonApiError>
where
    T: DeserializeOwned,
    F: Future<Output = Result<bool, ServiceError>>,
{
    match serde_json::from_slice(body) {
        Ok(changes) => Ok(changes),
        Err(e) => {
            if !target_exists.await? {
                return Err(JsonApiError::not_found(resource));
            }
            Err(JsonApiError::invalid_body(e.to_string()))
        }
    }
}
