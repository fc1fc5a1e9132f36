use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use models::session::{self, NewSession, SessionChanges};
use service::session_service::{self, SessionView};

use crate::errors::JsonApiError;
use crate::extract::{parse_changes, ApiJson, ApiPath};
use crate::observability::count_requests;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", routing::get(list).post(create))
        .route("/:id", routing::get(get).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state("sessions", count_requests))
}

#[utoipa::path(
    get, path = "/api/sessions", tag = "sessions",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::SessionDoc]),
        (status = 500, description = "Unexpected Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<session::Model>>, JsonApiError> {
    let rows = session_service::list_sessions(state.store()).await?;
    info!(count = rows.len(), "list sessions");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/sessions/{id}", tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "OK, with the customer embedded", body = crate::openapi::SessionDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<SessionView>, JsonApiError> {
    session_service::get_session(state.store(), id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("session"))
}

#[utoipa::path(
    post, path = "/api/sessions", tag = "sessions",
    request_body = crate::openapi::NewSessionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SessionDoc),
        (status = 400, description = "Validation Error or unknown customer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewSession>,
) -> Result<(StatusCode, Json<session::Model>), JsonApiError> {
    let created = session_service::create_session(state.store(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/sessions/{id}", tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = crate::openapi::SessionChangesDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SessionDoc),
        (status = 400, description = "Validation Error or unknown customer", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<session::Model>, JsonApiError> {
    let exists = async { session_service::get_session(state.store(), id).await.map(|found| found.is_some()) };
    let changes: SessionChanges = parse_changes(&body, exists, "session").await?;
    session_service::update_session(state.store(), id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("session"))
}

#[utoipa::path(
    delete, path = "/api/sessions/{id}", tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    match session_service::delete_session(state.store(), id).await? {
        0 => Err(JsonApiError::not_found("session")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
