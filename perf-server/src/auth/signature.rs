//! Payload authentication code (HMAC-SHA256 over the raw request body)
//!
//! The code is always computed over the exact bytes received. Never feed a
//! re-serialized document here: key order or whitespace changes the code.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("authentication code is not valid hex")]
    Malformed,
    #[error("authentication code mismatch")]
    Mismatch,
    #[error("HMAC key error")]
    Key,
}

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Malformed => AppError::new(ErrorCode::SignatureMalformed),
            SignatureError::Mismatch => AppError::authentication_failed(),
            SignatureError::Key => AppError::internal(err.to_string()),
        }
    }
}

/// Decode the hex code from the `Authorization` header.
///
/// A missing header decodes to an empty code, which can never match.
pub fn decode_signature(header: Option<&str>) -> Result<Vec<u8>, SignatureError> {
    hex::decode(header.unwrap_or("").trim()).map_err(|_| SignatureError::Malformed)
}

fn mac(secret: &str, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::Key)?;
    mac.update(payload);
    Ok(mac)
}

/// Hex-encoded authentication code for `payload`
pub fn sign(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    Ok(hex::encode(mac(secret, payload)?.finalize().into_bytes()))
}

/// Verify `code` against `payload` in constant time
pub fn verify(secret: &str, payload: &[u8], code: &[u8]) -> Result<(), SignatureError> {
    mac(secret, payload)?
        .verify_slice(code)
        .map_err(|_| SignatureError::Mismatch)
}
