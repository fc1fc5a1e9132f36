use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    routing, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use models::product::{self, NewProduct, ProductChanges};
use service::product_service::{self, ProductView};

use crate::errors::JsonApiError;
use crate::extract::{parse_changes, ApiJson, ApiPath};
use crate::observability::count_requests;
use crate::routes::ServerState;

/// Mounted under both `/api/products` and `/api/services`.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", routing::get(list).post(create))
        .route("/:id", routing::get(get).put(update).delete(delete))
        .route_layer(middleware::from_fn_with_state("products", count_requests))
}

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::ProductDoc]),
        (status = 500, description = "Unexpected Error", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    let rows = product_service::list_products(state.store()).await?;
    info!(count = rows.len(), "list products");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK, with the owning customer embedded", body = crate::openapi::ProductDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<ProductView>, JsonApiError> {
    product_service::get_product(state.store(), id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("product"))
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error or unknown customer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<product::Model>), JsonApiError> {
    let created = product_service::create_product(state.store(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::ProductChangesDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error or unknown customer", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<product::Model>, JsonApiError> {
    let exists = async { product_service::get_product(state.store(), id).await.map(|found| found.is_some()) };
    let changes: ProductChanges = parse_changes(&body, exists, "product").await?;
    product_service::update_product(state.store(), id, changes)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("product"))
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    match product_service::delete_product(state.store(), id).await? {
        0 => Err(JsonApiError::not_found("product")),
        _ => Ok(StatusCode::NO_CONTENT),
    }
}
