use pixie_common::{PanelError, TabId, TOP_LEVEL_FRAME_ID};
use tracing::{debug, warn};

use crate::host::DevtoolsEvent;
use crate::message::TabInfo;
use crate::origin::OriginVerdict;

use super::ActionFrameService;

/// Error page shown when the toolbar action is used on an extension store.
pub const ERR_BROWSER_ACTION_TOGGLE_WEBSTORE: &str = "ERR_BROWSER_ACTION_TOGGLE_WEBSTORE";

/// Error page shown when toggling the panel failed.
pub const ERR_BROWSER_ACTION_TOGGLE: &str = "ERR_BROWSER_ACTION_TOGGLE";

impl ActionFrameService {
    /// Toolbar action clicked in `tab`: toggle the panel if the page allows it.
    ///
    /// Unsupported pages never reach the host toggle; the user is shown an
    /// explanation instead and `UnsupportedOrigin` is returned.
    pub async fn handle_browser_action(&self, tab: &TabInfo) -> Result<(), PanelError> {
        let url = tab.url.clone().unwrap_or_default();
        match self.origins.check(tab.url.as_deref()) {
            OriginVerdict::Supported => {}
            OriginVerdict::Webstore { host } => {
                if let Err(e) = self
                    .host
                    .show_error_in_options(ERR_BROWSER_ACTION_TOGGLE_WEBSTORE, tab.index)
                    .await
                {
                    warn!(error = %e, "failed to show webstore error page");
                }
                return Err(PanelError::UnsupportedOrigin {
                    url,
                    reason: format!("extension store {host}"),
                });
            }
            OriginVerdict::UnsupportedScheme { scheme } => {
                if let Err(e) = self.host.open_options_page().await {
                    warn!(error = %e, "failed to open options page");
                }
                return Err(PanelError::UnsupportedOrigin {
                    url,
                    reason: format!("unsupported scheme {scheme:?}"),
                });
            }
        }

        // A frame is about to be created or removed; stop routing to the old one.
        self.store.invalidate_frame(tab.id).await;

        if let Err(e) = self.toggle_action_frame(tab.id).await {
            if let Err(shown) = self
                .host
                .show_error_in_options(ERR_BROWSER_ACTION_TOGGLE, tab.index)
                .await
            {
                warn!(error = %shown, "failed to show toggle error page");
            }
            self.reporter.report(&e);
            return Err(e);
        }
        Ok(())
    }

    async fn toggle_action_frame(&self, tab_id: TabId) -> Result<(), PanelError> {
        self.host
            .ensure_content_script(tab_id, TOP_LEVEL_FRAME_ID)
            .await?;
        let nonce = self.host.toggle_panel(tab_id, TOP_LEVEL_FRAME_ID).await?;
        debug!(%tab_id, nonce = ?nonce, "toggled action panel");
        self.store.set_nonce(tab_id, nonce).await;

        // The editor now has page access for this tab, if it's open.
        self.host.emit_devtools(DevtoolsEvent::HistoryStateUpdate {
            tab_id,
            frame_id: TOP_LEVEL_FRAME_ID,
        });
        Ok(())
    }
}
