//! Health check endpoint

use axum::Json;
use serde::Serialize;
use shared::error::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        service: "perf-server",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
