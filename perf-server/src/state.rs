//! Application state for perf-server

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::results::ResultsLog;
use crate::schema::PayloadSchema;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Receipt clock
pub type Clock = fn() -> DateTime<Utc>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// HMAC key for payload signatures
    pub shared_secret: Arc<str>,
    /// Password of the `admin` operator
    pub admin_password: Arc<str>,
    /// Sole writer of the results log
    pub results: Arc<ResultsLog>,
    /// Compiled payload schema
    pub schema: Arc<PayloadSchema>,
    /// Trust proxy headers for the recorded source address
    pub behind_proxy: bool,
    /// Ingest body read timeout
    pub read_timeout: std::time::Duration,
    /// Timeout for every route except ingest
    pub write_timeout: std::time::Duration,
    /// Receipt clock, `Utc::now` outside tests
    pub now: Clock,
}

impl AppState {
    /// Create a new AppState: open the results log and compile the schema
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let results = ResultsLog::open(config.results_path()).await?;
        tracing::info!(path = %results.path().display(), "Results log ready");

        Ok(Self {
            shared_secret: config.shared_secret.as_str().into(),
            admin_password: config.admin_password.as_str().into(),
            results: Arc::new(results),
            schema: Arc::new(PayloadSchema::new()?),
            behind_proxy: config.behind_proxy,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            now: Utc::now,
        })
    }

    /// Replace the receipt clock
    pub fn with_clock(mut self, now: Clock) -> Self {
        self.now = now;
        self
    }
}
