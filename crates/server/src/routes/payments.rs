use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use models::payment::{self, NewPayment, PaymentChanges};
use service::payment_service::{self, PaymentView};

use crate::errors::JsonApiError;
use crate::extract::{parse_changes, ApiJson, ApiPath};
use crate::observability::count_requests;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", routing::get(list).post(create))
        .route("/:id", routing::get(get).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state("payments", count_requests))
}

#[utoipa::path(
    get, path = "/api/payments", tag = "payments",
    responses(
        (status = 200, description = "List OK, each with customer and product", body = [crate::openapi::PaymentDoc]),
        (status = 500, description = "Unexpected Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<PaymentView>>, JsonApiError> {
    let rows = payment_service::list_payments(state.store()).await?;
    info!(count = rows.len(), "list payments");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/payments/{id}", tag = "payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "OK, with customer and product", body = crate::openapi::PaymentDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<PaymentView>, JsonApiError> {
    payment_service::get_payment(state.store(), id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("payment"))
}

#[utoipa::path(
    post, path = "/api/payments", tag = "payments",
    request_body = crate::openapi::NewPaymentDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PaymentDoc),
        (status = 400, description = "Validation Error or unknown customer/product", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewPayment>,
) -> Result<(StatusCode, Json<payment::Model>), JsonApiError> {
    let created = payment_service::create_payment(state.store(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/payments/{id}", tag = "payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = crate::openapi::PaymentChangesDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PaymentDoc),
        (status = 400, description = "Validation Error or unknown customer/product", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<payment::Model>, JsonApiError> {
    let exists = async { payment_service::get_payment(state.store(), id).await.map(|found| found.is_some()) };
    let changes: PaymentChanges = parse_changes(&body, exists, "payment").await?;
    payment_service::update_payment(state.store(), id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("payment"))
}

#[utoipa::path(
    delete, path = "/api/payments/{id}", tag = "payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    match payment_service::delete_payment(state.store(), id).await? {
        0 => Err(JsonApiError::not_found("payment")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
