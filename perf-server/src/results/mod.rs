//! Results persistence
//!
//! - [`log`]: the append-only JSON-lines log (sole writer)
//! - [`export`]: two-pass CSV export over an independent read handle

pub mod export;
pub mod log;

pub use export::{ExportColumns, ExportError, csv_stream};
pub use log::{ResultsLog, ResultsLogError};
