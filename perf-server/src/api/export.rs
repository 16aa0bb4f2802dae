//! Results export
//!
//! GET /v1/user/performance/csv, behind `require_admin`

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use shared::error::AppResult;

use crate::results::csv_stream;
use crate::state::AppState;

/// Stream the results log as CSV.
///
/// Failures before the header (missing file, corrupt line) produce an error
/// response; a failure mid-stream truncates the body.
pub async fn export_csv(State(state): State<AppState>) -> AppResult<Response> {
    let rows = csv_stream(state.results.path().to_path_buf()).await?;
    tracing::info!("Streaming results export");

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        Body::from_stream(rows),
    )
        .into_response())
}
