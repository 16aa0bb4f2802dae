//! perf-server: authenticated ingest of client performance results
//!
//! - Accepts HMAC-signed result submissions and appends them to a JSON-lines log
//! - Exports the log as CSV to the `admin` operator
//! - Serves a signed example submission for client integration testing

pub mod api;
pub mod auth;
pub mod config;
pub mod results;
pub mod schema;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;
