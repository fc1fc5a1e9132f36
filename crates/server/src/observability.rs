use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "customer_hub_requests_total",
        "Requests handled per resource and status class",
        &["resource", "outcome"]
    )
    .expect("register requests_total")
});

pub static SERVICE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "customer_hub_service_errors_total",
        "Service errors by kind",
        &["kind"]
    )
    .expect("register service_errors_total")
});

fn outcome(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Route layer counting every response of one resource router.
pub async fn count_requests(State(resource): State<&'static str>, req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    REQUESTS_TOTAL.with_label_values(&[resource, outcome(res.status())]).inc();
    res
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
