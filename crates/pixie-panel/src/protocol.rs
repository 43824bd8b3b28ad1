//! Messenger surface of the background: requests from the content script,
//! the panel frame and the toolbar action.

use pixie_common::Nonce;
use serde::{Deserialize, Serialize};

use crate::message::{FrameMessage, MessageSender, TabInfo};
use crate::service::ActionFrameService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundRequest {
    RegisterActionFrame {
        nonce: Nonce,
    },
    ForwardFrameNotification {
        sequence: u64,
        message: FrameMessage,
    },
    ShowActionFrame,
    HideActionFrame,
    BrowserActionClicked {
        tab: TabInfo,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BackgroundResponse {
    Ok,
    Error { message: String },
}

impl ActionFrameService {
    /// Run one messenger request on behalf of `sender`.
    pub async fn dispatch(
        &self,
        sender: &MessageSender,
        request: BackgroundRequest,
    ) -> BackgroundResponse {
        let result = match request {
            BackgroundRequest::RegisterActionFrame { nonce } => {
                self.register_action_frame(sender, &nonce).await;
                Ok(())
            }
            BackgroundRequest::ForwardFrameNotification { sequence, message } => {
                self.forward_frame_notification(sender, sequence, message)
                    .await;
                Ok(())
            }
            BackgroundRequest::ShowActionFrame => self.show_action_frame(sender).await,
            BackgroundRequest::HideActionFrame => self.hide_action_frame(sender).await,
            BackgroundRequest::BrowserActionClicked { tab } => {
                self.handle_browser_action(&tab).await
            }
        };

        match result {
            Ok(()) => BackgroundResponse::Ok,
            Err(e) => BackgroundResponse::Error {
                message: e.to_string(),
            },
        }
    }
}
