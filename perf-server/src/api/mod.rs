//! API routes for perf-server

pub mod example;
pub mod export;
pub mod health;
pub mod ingest;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_admin;
use crate::state::AppState;

pub const INGEST_PATH: &str = "/v1/user/performance";
pub const EXPORT_PATH: &str = "/v1/user/performance/csv";
pub const EXAMPLE_PATH: &str = "/example";

/// Request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build the fully layered application router
pub fn router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    // Client submissions (HMAC authenticated). Merged after the write timeout:
    // the handler bounds its own body read.
    let ingest = Router::new().route(INGEST_PATH, post(ingest::submit_results));

    // Operator export (Basic authenticated)
    let export = Router::new()
        .route(EXPORT_PATH, get(export::export_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health::health_check))
        .route(EXAMPLE_PATH, get(example::example_command))
        .merge(export)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.write_timeout,
        ))
        .merge(ingest)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, XRequestId))
        .with_state(state)
}
