use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use models::verification::{self, NewVerification, VerificationChanges};
use service::verification_service::{self, VerificationView};

use crate::errors::JsonApiError;
use crate::extract::{parse_changes, ApiJson, ApiPath};
use crate::observability::count_requests;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", routing::get(list).post(create))
        .route("/:id", routing::get(get).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state("verifications", count_requests))
}

#[utoipa::path(
    get, path = "/api/verifications", tag = "verifications",
    responses(
        (status = 200, description = "List OK, newest first, with relations", body = [crate::openapi::VerificationDoc]),
        (status = 500, description = "Unexpected Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<VerificationView>>, JsonApiError> {
    let rows = verification_service::list_verifications(state.store()).await?;
    info!(count = rows.len(), "list verifications");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/verifications/{id}", tag = "verifications",
    params(("id" = Uuid, Path, description = "Verification ID")),
    responses(
        (status = 200, description = "OK, with customer, session and payment", body = crate::openapi::VerificationDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<VerificationView>, JsonApiError> {
    verification_service::get_verification(state.store(), id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("verification"))
}

#[utoipa::path(
    post, path = "/api/verifications", tag = "verifications",
    request_body = crate::openapi::NewVerificationDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::VerificationDoc),
        (status = 400, description = "Validation Error or unknown reference", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewVerification>,
) -> Result<(StatusCode, Json<verification::Model>), JsonApiError> {
    let created = verification_service::create_verification(state.store(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/verifications/{id}", tag = "verifications",
    params(("id" = Uuid, Path, description = "Verification ID")),
    request_body = crate::openapi::VerificationChangesDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::VerificationDoc),
        (status = 400, description = "Validation Error or unknown reference", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<verification::Model>, JsonApiError> {
    let exists = async { verification_service::get_verification(state.store(), id).await.map(|found| found.is_some()) };
    let changes: VerificationChanges = parse_changes(&body, exists, "verification").await?;
    verification_service::update_verification(state.store(), id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("verification"))
}

#[utoipa::path(
    delete, path = "/api/verifications/{id}", tag = "verifications",
    params(("id" = Uuid, Path, description = "Verification ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    match verification_service::delete_verification(state.store(), id).await? {
        0 => Err(JsonApiError::not_found("verification")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
