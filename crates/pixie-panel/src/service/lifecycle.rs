use pixie_common::{Nonce, PanelError, TOP_LEVEL_FRAME_ID};
use tracing::{debug, warn};

use crate::message::{FrameMessage, MessageSender};

use super::ActionFrameService;

impl ActionFrameService {
    /// Called by a freshly injected panel frame with the nonce it was
    /// created with. A nonce mismatch is logged; the frame is bound anyway.
    pub async fn register_action_frame(&self, sender: &MessageSender, nonce: &Nonce) {
        let tab_id = sender.tab_id;
        if let Some(expected) = self.store.nonce(tab_id).await {
            if &expected != nonce {
                warn!(%tab_id, %expected, actual = %nonce, "action frame nonce mismatch");
            }
        }

        debug!(%tab_id, frame_id = %sender.frame_id, "setting action frame metadata");
        self.store.bind_frame(tab_id, sender.frame_id).await;
    }

    /// Forward a render notification from the content script to the panel.
    ///
    /// Nobody awaits the outcome, so failures go to the error reporter.
    pub async fn forward_frame_notification(
        &self,
        sender: &MessageSender,
        sequence: u64,
        message: FrameMessage,
    ) {
        if let Err(e) = self
            .forwarder
            .forward_when_ready(sender.tab_id, sequence, message)
            .await
        {
            self.reporter.report(&e);
        }
    }

    pub async fn show_action_frame(&self, sender: &MessageSender) -> Result<(), PanelError> {
        let tab_id = sender.tab_id;
        self.store.clear_frame(tab_id).await;
        let nonce = self.host.show_panel(tab_id, TOP_LEVEL_FRAME_ID).await?;
        debug!(%tab_id, nonce = ?nonce, "setting action frame nonce");
        self.store.set_nonce(tab_id, nonce).await;
        self.store.clear_cursor(tab_id).await;
        Ok(())
    }

    pub async fn hide_action_frame(&self, sender: &MessageSender) -> Result<(), PanelError> {
        let tab_id = sender.tab_id;
        self.store.clear_frame(tab_id).await;
        self.host.hide_panel(tab_id, TOP_LEVEL_FRAME_ID).await?;
        debug!(%tab_id, "clearing action frame nonce");
        self.store.clear_nonce(tab_id).await;
        self.store.clear_cursor(tab_id).await;
        Ok(())
    }
}
