//! Request authentication
//!
//! - [`signature`]: HMAC over submitted payloads (ingest)
//! - [`session`]: session timestamp freshness window (ingest)
//! - [`admin`]: operator Basic credential (export)

pub mod admin;
pub mod session;
pub mod signature;

pub use admin::require_admin;
