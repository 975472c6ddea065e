use crate::api::ApiClient;
use crate::error::{DashboardError, Result};
use crate::poller::DEFAULT_POLL_INTERVAL;
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Desktop dashboard for CleanStream uploads
#[derive(Debug, Clone, Parser)]
#[command(name = "cleanstream-dashboard", version, about)]
pub struct DashboardConfig {
    /// Base URL of the CleanStream REST backend
    #[arg(long, env = "CLEANSTREAM_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// How often to check the status of a file being processed
    #[arg(long, env = "CLEANSTREAM_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub poll_interval_ms: u64,

    #[arg(long, env = "CLEANSTREAM_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        ApiClient::parse_base_url(&self.api_base)?;
        if self.poll_interval_ms == 0 {
            return Err(DashboardError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
