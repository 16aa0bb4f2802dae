//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 401 Unauthorized (operator credential, carries a challenge)
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            // 403 Forbidden (payload authentication code)
            Self::AuthenticationFailed | Self::SignatureMalformed => StatusCode::FORBIDDEN,

            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError | Self::StorageCorrupted => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::InvalidPayload
            | Self::InvalidSessionId
            | Self::SessionOutOfWindow => StatusCode::BAD_REQUEST,
        }
    }
}
