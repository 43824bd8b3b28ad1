use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timings for delivering notifications to a tab's action frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Poll/backoff interval in milliseconds (valid range: 1-1000).
    pub retry_interval_ms: u32,
    /// Upper bound on waiting for a frame or a delivery, in milliseconds
    /// (valid range: retry_interval_ms-60000).
    pub max_wait_ms: u32,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: 50,
            max_wait_ms: 3000,
        }
    }
}

impl ForwardingConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.retry_interval_ms))
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(u64::from(self.max_wait_ms))
    }
}
