//! Shared types for the performance telemetry service
//!
//! Wire data model and the unified error system used by the server and
//! by anything that produces or consumes its payloads.

pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Attribute, Event, LogRecord, Metadata, PerformanceResult};
