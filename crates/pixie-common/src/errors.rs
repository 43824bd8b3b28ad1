use std::path::PathBuf;
use std::time::Duration;

use crate::id::TabId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures reported by the extension host when the background calls into it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The receiving end does not exist (yet). Retried by the forwarder.
    #[error("could not establish connection: {0}")]
    Unreachable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("host rejected request: {0}")]
    Rejected(String),
}

impl HostError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel not supported on {url}: {reason}")]
    UnsupportedOrigin { url: String, reason: String },

    #[error("action frame not ready for {tab_id} after {}ms", .elapsed.as_millis())]
    FrameNotReady { tab_id: TabId, elapsed: Duration },

    #[error("action frame for {tab_id} not ready in {}ms", .timeout.as_millis())]
    DeliveryTimeout { tab_id: TabId, timeout: Duration },

    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Cancelled(String),
}
