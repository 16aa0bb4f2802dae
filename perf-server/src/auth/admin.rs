//! Operator authentication for the export endpoint (HTTP Basic)

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use shared::error::AppError;
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// The only operator account
pub const ADMIN_USERNAME: &str = "admin";

/// Challenge sent with every 401
pub const BASIC_CHALLENGE: &str = r#"Basic realm="Private""#;

/// Decode `Authorization: Basic <base64(user:pass)>`
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_owned(), pass.to_owned()))
}

/// True if the request carries the admin credential. Password comparison is constant time.
pub fn check_basic_auth(headers: &HeaderMap, admin_password: &str) -> bool {
    let Some((user, pass)) = basic_credentials(headers) else {
        return false;
    };
    let password_ok = bool::from(pass.as_bytes().ct_eq(admin_password.as_bytes()));
    user == ADMIN_USERNAME && password_ok
}

fn challenge() -> Response {
    (
        [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
        AppError::unauthorized(),
    )
        .into_response()
}

/// Middleware guarding operator routes
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if !check_basic_auth(request.headers(), &state.admin_password) {
        tracing::warn!(uri = %request.uri(), "Rejected operator credential");
        return Err(challenge());
    }
    Ok(next.run(request).await)
}
