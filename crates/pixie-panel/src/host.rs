//! Collaborators the background calls into: the extension host and the
//! error telemetry sink.

use async_trait::async_trait;
use pixie_common::{FrameId, HostError, Nonce, PanelError, TabId};
use serde::{Deserialize, Serialize};

use crate::message::FrameMessage;

/// Events pushed to an open devtools (page editor) panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DevtoolsEvent {
    /// The tab's page access changed; the editor should refresh its view.
    HistoryStateUpdate { tab_id: TabId, frame_id: FrameId },
}

/// The browser extension platform as seen from the background.
#[async_trait]
pub trait PanelHost: Send + Sync {
    /// Deliver a message to one frame of a tab. Fails with
    /// `HostError::Unreachable` while nothing in the frame is listening.
    async fn send_to_frame(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: &FrameMessage,
    ) -> Result<(), HostError>;

    async fn ensure_content_script(&self, tab_id: TabId, frame_id: FrameId)
        -> Result<(), HostError>;

    /// Flip panel visibility; returns the nonce of a newly created panel.
    async fn toggle_panel(&self, tab_id: TabId, frame_id: FrameId)
        -> Result<Option<Nonce>, HostError>;

    async fn show_panel(&self, tab_id: TabId, frame_id: FrameId)
        -> Result<Option<Nonce>, HostError>;

    async fn hide_panel(&self, tab_id: TabId, frame_id: FrameId) -> Result<(), HostError>;

    async fn open_options_page(&self) -> Result<(), HostError>;

    /// Open the options page on an explanatory error screen.
    async fn show_error_in_options(
        &self,
        code: &str,
        tab_index: Option<u32>,
    ) -> Result<(), HostError>;

    /// Fire-and-forget notification to the devtools listener.
    fn emit_devtools(&self, event: DevtoolsEvent);
}

/// Sink for errors nobody is awaiting.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &PanelError);
}

/// Reports errors to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &PanelError) {
        tracing::error!(error = %error, "background error");
    }
}
