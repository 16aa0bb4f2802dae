//! Example submission command
//!
//! GET /example returns a ready-to-run `curl` command with a freshly signed
//! canned payload. For client integration testing only.

use axum::extract::State;
use axum::http::{HeaderMap, Uri, header};
use shared::error::{AppError, AppResult};
use shared::models::{Attribute, Event, PerformanceResult};

use super::INGEST_PATH;
use crate::auth::session::format_session_timestamp;
use crate::auth::signature::sign;
use crate::state::AppState;

const EXAMPLE_USER_ID: &str = "d1ac887243389d94544e4d9cc5524ab5";
const EXAMPLE_BUILD_INFO: &str = "1.0.0.7";

fn example_result(now: chrono::DateTime<chrono::Utc>) -> PerformanceResult {
    PerformanceResult {
        build_info: EXAMPLE_BUILD_INFO.to_string(),
        session_id: format!("{EXAMPLE_USER_ID}-{}", format_session_timestamp(now)),
        user_id: EXAMPLE_USER_ID.to_string(),
        events: vec![Event {
            event_name: "Score".to_string(),
            attributes: vec![Attribute {
                name: "Score.Num".to_string(),
                value: "0".to_string(),
            }],
        }],
    }
}

pub async fn example_command(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> AppResult<String> {
    let body = serde_json::to_string(&example_result((state.now)()))
        .map_err(|e| AppError::internal(e.to_string()))?;
    let code = sign(&state.shared_secret, body.as_bytes())?;

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.host())
        .unwrap_or("localhost");

    Ok(format!(
        "curl -v -H 'Content-Type: application/json' -H 'Authorization: {code}' https://{host}{INGEST_PATH} -d '{body}'\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_example_payload_shape() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 1).unwrap();
        let body = serde_json::to_string(&example_result(now)).unwrap();
        assert_eq!(
            body,
            r#"{"buildInfo":"1.0.0.7","sessionId":"d1ac887243389d94544e4d9cc5524ab5-2024.03.09-14.05.01","userId":"d1ac887243389d94544e4d9cc5524ab5","events":[{"eventName":"Score","attributes":[{"name":"Score.Num","value":"0"}]}]}"#
        );
    }
}
