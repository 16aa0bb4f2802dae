//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with structured error code
///
/// This is the error type every handler returns. It carries:
/// - a standardized [`ErrorCode`] (which fixes the HTTP status)
/// - a client-facing message, never internal details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Payload failed structural validation or could not be parsed
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidPayload, msg)
    }

    /// Payload authentication code mismatch
    pub fn authentication_failed() -> Self {
        Self::new(ErrorCode::AuthenticationFailed)
    }

    /// Operator credential missing or wrong
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Body exceeds the accepted size
    pub fn payload_too_large() -> Self {
        Self::new(ErrorCode::PayloadTooLarge)
    }

    /// Results log read/write failure
    pub fn storage() -> Self {
        Self::new(ErrorCode::StorageError)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Unified API response structure
///
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: "OK".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            data: None,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::InvalidPayload);
        assert_eq!(err.code, ErrorCode::InvalidPayload);
        assert_eq!(err.message, "Invalid payload");
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::invalid_payload("events must be an array");
        assert_eq!(err.code, ErrorCode::InvalidPayload);
        assert_eq!(err.message, "events must be an array");
        assert_eq!(format!("{}", err), "events must be an array");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::authentication_failed().http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::unauthorized().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::payload_too_large().http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::storage().http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_response_error() {
        let response = ApiResponse::<()>::error(&AppError::authentication_failed());
        assert_eq!(response.code, 1002);
        assert_eq!(response.message, "Authentication failed");
        assert!(response.data.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"code":1002,"message":"Authentication failed"}"#);
    }

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("ok");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":0"));
        assert!(json.contains("\"data\":\"ok\""));
    }

    #[test]
    fn test_into_response_status() {
        use axum::response::IntoResponse;

        let response = AppError::invalid_payload("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::storage().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
