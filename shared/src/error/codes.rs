//! Unified error codes for the performance telemetry service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Payload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Content type not accepted by the endpoint
    UnsupportedMediaType = 3,
    /// Request body not received within the read timeout
    RequestTimeout = 4,

    // ==================== 1xxx: Auth ====================
    /// Operator credential missing or wrong
    NotAuthenticated = 1001,
    /// Payload authentication code does not match
    AuthenticationFailed = 1002,
    /// Authentication code could not be decoded
    SignatureMalformed = 1003,

    // ==================== 2xxx: Payload ====================
    /// Payload is not valid JSON or does not match the schema
    InvalidPayload = 2001,
    /// Session identifier is not `<user>-<timestamp>`
    InvalidSessionId = 2002,
    /// Session timestamp is outside the freshness window
    SessionOutOfWindow = 2003,
    /// Payload exceeds the body size limit
    PayloadTooLarge = 2004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Results log could not be written or read
    StorageError = 9002,
    /// Results log contains an undecodable record
    StorageCorrupted = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::UnsupportedMediaType => "Unsupported media type",
            ErrorCode::RequestTimeout => "Request body not received in time",

            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::AuthenticationFailed => "Authentication failed",
            ErrorCode::SignatureMalformed => "Malformed authentication code",

            ErrorCode::InvalidPayload => "Invalid payload",
            ErrorCode::InvalidSessionId => "Invalid session identifier",
            ErrorCode::SessionOutOfWindow => "Session timestamp outside accepted window",
            ErrorCode::PayloadTooLarge => "Payload too large",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::StorageCorrupted => "Storage corrupted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            3 => Ok(ErrorCode::UnsupportedMediaType),
            4 => Ok(ErrorCode::RequestTimeout),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::AuthenticationFailed),
            1003 => Ok(ErrorCode::SignatureMalformed),

            2001 => Ok(ErrorCode::InvalidPayload),
            2002 => Ok(ErrorCode::InvalidSessionId),
            2003 => Ok(ErrorCode::SessionOutOfWindow),
            2004 => Ok(ErrorCode::PayloadTooLarge),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
