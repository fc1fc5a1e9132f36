use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::store::Store;

use crate::observability::encode_metrics;
use crate::openapi::ApiDoc;

pub mod customers;
pub mod payments;
pub mod products;
pub mod sessions;
pub mod verifications;

/// Shared handler state; the store is injected so tests can swap in memory.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn Store>,
}

impl ServerState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}

/// Build the full application router: health, metrics, docs and the `/api` resources.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        // older clients call products "services"
        .nest("/services", products::router())
        .nest("/sessions", sessions::router())
        .nest("/payments", payments::router())
        .nest("/verifications", verifications::router());

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
