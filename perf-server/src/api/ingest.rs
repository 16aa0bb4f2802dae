//! Results submission
//!
//! POST /v1/user/performance
//!
//! Pipeline, stopping at the first failure:
//! 1. `Content-Type: application/json` gate
//! 2. decode the `Authorization` code
//! 3. read the body (capped at [`MAX_BODY_BYTES`], bounded by the read timeout)
//! 4. schema validation on the raw bytes
//! 5. typed parse
//! 6. session timestamp freshness
//! 7. HMAC over the raw bytes
//! 8. append to the results log

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Metadata, PerformanceResult};

use crate::auth::session::{check_freshness, session_timestamp};
use crate::auth::signature::{decode_signature, verify};
use crate::state::AppState;
use crate::util::client_addr;

/// Largest accepted submission body (1 MiB)
pub const MAX_BODY_BYTES: usize = 1 << 20;

fn require_json(headers: &HeaderMap) -> AppResult<()> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"));
    if is_json {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::UnsupportedMediaType))
    }
}

/// Read the whole body, refusing anything over [`MAX_BODY_BYTES`].
///
/// A declared `Content-Length` over the cap is rejected before reading.
async fn read_capped(headers: &HeaderMap, body: Body) -> AppResult<Bytes> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > MAX_BODY_BYTES as u64) {
        return Err(AppError::payload_too_large());
    }

    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::payload_too_large())
}

pub async fn submit_results(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<StatusCode> {
    let (parts, body) = request.into_parts();
    require_json(&parts.headers)?;

    let ip = client_addr(&parts.headers, &parts.extensions, state.behind_proxy);

    let code = match decode_signature(
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    ) {
        Ok(code) => code,
        Err(err) => {
            tracing::warn!(ip = %ip, error = %err, "Undecodable payload authentication code");
            return Err(err.into());
        }
    };

    // The read timeout bounds receiving the body only, never the append
    let raw = tokio::time::timeout(state.read_timeout, read_capped(&parts.headers, body))
        .await
        .map_err(|_| {
            tracing::warn!(ip = %ip, "Request body not received within read timeout");
            AppError::new(ErrorCode::RequestTimeout)
        })??;

    let document = state.schema.validate(&raw)?;
    let result: PerformanceResult =
        serde_json::from_value(document).map_err(|e| AppError::invalid_payload(e.to_string()))?;

    let now = (state.now)();

    let timestamp = session_timestamp(&result.session_id)?;
    if let Err(err) = check_freshness(timestamp, now) {
        tracing::warn!(
            ip = %ip,
            session_id = %result.session_id,
            %timestamp,
            "Session timestamp outside freshness window"
        );
        return Err(err.into());
    }

    if let Err(err) = verify(&state.shared_secret, &raw, &code) {
        tracing::warn!(
            ip = %ip,
            session_id = %result.session_id,
            error = %err,
            "Payload authentication failed"
        );
        return Err(err.into());
    }

    // Detached so a dropped request cannot cancel a write already in flight
    let metadata = Metadata { date_time: now, ip };
    let results = state.results.clone();
    tokio::spawn(async move { results.append(&metadata, &result).await })
        .await
        .map_err(|e| AppError::internal(e.to_string()))??;

    Ok(StatusCode::OK)
}
