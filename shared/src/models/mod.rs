//! Data models
//!
//! Shared between the ingest server and its clients (via API).

pub mod performance;

// Re-exports
pub use performance::*;
