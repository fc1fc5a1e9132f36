use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use models::customer::{self, CustomerChanges, NewCustomer};
use service::customer_service;

use crate::errors::JsonApiError;
use crate::extract::{parse_changes, ApiJson, ApiPath};
use crate::observability::count_requests;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", routing::get(list).post(create))
        .route("/:id", routing::get(get).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state("customers", count_requests))
}

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::CustomerDoc]),
        (status = 500, description = "Unexpected Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<customer::Model>>, JsonApiError> {
    let rows = customer_service::list_customers(state.store()).await?;
    info!(count = rows.len(), "list customers");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<customer::Model>, JsonApiError> {
    customer_service::get_customer(state.store(), id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("customer"))
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::NewCustomerDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email in use", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewCustomer>,
) -> Result<(StatusCode, Json<customer::Model>), JsonApiError> {
    let created = customer_service::create_customer(state.store(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = crate::openapi::CustomerChangesDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Email in use", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<customer::Model>, JsonApiError> {
    let exists = async { customer_service::get_customer(state.store(), id).await.map(|found| found.is_some()) };
    let changes: CustomerChanges = parse_changes(&body, exists, "customer").await?;
    customer_service::update_customer(state.store(), id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("customer"))
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc),
        (status = 409, description = "Customer has pending payments", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    match customer_service::delete_customer(state.store(), id).await? {
        0 => Err(JsonApiError::not_found("customer")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
