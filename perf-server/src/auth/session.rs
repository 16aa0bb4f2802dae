//! Session identifier parsing and the freshness window
//!
//! A session id is `<userHash>-<YYYY.MM.DD-HH.MM.SS>`. The embedded timestamp
//! must fall strictly inside `now ± FRESHNESS_WINDOW_MINUTES` (server receipt clock),
//! which bounds replay without tracking nonces.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Textual timestamp format embedded in session ids
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";

/// Accepted skew between the session timestamp and receipt time, both ways
pub const FRESHNESS_WINDOW_MINUTES: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("session id must be <user>-<timestamp>")]
    Shape,
    #[error("session timestamp is not YYYY.MM.DD-HH.MM.SS")]
    Timestamp,
    #[error("session timestamp outside accepted window")]
    OutOfWindow,
}

impl From<SessionIdError> for AppError {
    fn from(err: SessionIdError) -> Self {
        match err {
            SessionIdError::Shape | SessionIdError::Timestamp => {
                AppError::with_message(ErrorCode::InvalidSessionId, err.to_string())
            }
            SessionIdError::OutOfWindow => AppError::new(ErrorCode::SessionOutOfWindow),
        }
    }
}

/// Extract the UTC timestamp embedded in a session id
pub fn session_timestamp(session_id: &str) -> Result<DateTime<Utc>, SessionIdError> {
    let (_, timestamp) = session_id.split_once('-').ok_or(SessionIdError::Shape)?;
    NaiveDateTime::parse_from_str(timestamp, SESSION_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| SessionIdError::Timestamp)
}

/// Check `timestamp` lies strictly within `now ± FRESHNESS_WINDOW_MINUTES`
pub fn check_freshness(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), SessionIdError> {
    let window = Duration::minutes(FRESHNESS_WINDOW_MINUTES);
    if timestamp > now - window && timestamp < now + window {
        Ok(())
    } else {
        Err(SessionIdError::OutOfWindow)
    }
}

/// Format a receipt time the way clients embed it in session ids
pub fn format_session_timestamp(time: DateTime<Utc>) -> String {
    time.format(SESSION_TIMESTAMP_FORMAT).to_string()
}
