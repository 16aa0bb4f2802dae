//! Server configuration

use std::path::PathBuf;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// File name of the results log inside the data directory
pub const RESULTS_FILE_NAME: &str = "results.json";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HMAC key shared with the submitting clients
    pub shared_secret: String,
    /// Password of the `admin` operator (export endpoint)
    pub admin_password: String,
    /// Listen address, e.g. `0.0.0.0:9095`
    pub http_addr: String,
    /// Directory holding the results log
    pub data_dir: PathBuf,
    /// Trust X-Forwarded-For / X-Real-IP / Forwarded for the recorded source address
    pub behind_proxy: bool,
    /// Upper bound for receiving a submission body
    pub read_timeout: Duration,
    /// Upper bound for any non-ingest request to produce its response
    pub write_timeout: Duration,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn secs_var(name: &str, default: u64) -> Duration {
        Duration::from_secs(
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default),
        )
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            shared_secret: Self::require_secret("SHARED_SECRET", &environment)?,
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            http_addr: std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:9095".into()),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./")),
            behind_proxy: std::env::var("BEHIND_PROXY")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            read_timeout: Self::secs_var("READ_TIMEOUT_SECS", 5),
            write_timeout: Self::secs_var("WRITE_TIMEOUT_SECS", 10),
            environment,
        })
    }

    /// Path of the results log
    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(RESULTS_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_path_joins_data_dir() {
        let config = Config {
            environment: "development".into(),
            shared_secret: "s".into(),
            admin_password: "p".into(),
            http_addr: "127.0.0.1:0".into(),
            data_dir: PathBuf::from("/var/lib/perf"),
            behind_proxy: false,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
        };
        assert_eq!(
            config.results_path(),
            PathBuf::from("/var/lib/perf/results.json")
        );
    }
}
