//! Waiting for a tab's panel frame to announce itself.

use pixie_common::{FrameId, PanelError, TabId};
use tokio::time::Instant;

use crate::forwarder::PanelTimings;
use crate::session::SessionStore;

/// Resolve the frame bound for `tab_id`, waiting up to `timings.max_wait`
/// for `register_action_frame` to bind one.
///
/// Wakes on every frame registration and at least every
/// `timings.retry_interval`.
pub async fn wait_frame_id(
    store: &SessionStore,
    tab_id: TabId,
    timings: PanelTimings,
) -> Result<FrameId, PanelError> {
    let start = Instant::now();
    let deadline = start + timings.max_wait;

    loop {
        // Register interest before checking so a bind between the check and
        // the wait is not missed.
        let notified = store.frame_bound();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if let Some(frame_id) = store.frame_id(tab_id).await {
            return Ok(frame_id);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(PanelError::FrameNotReady {
                tab_id,
                elapsed: now - start,
            });
        }

        let wake_at = (now + timings.retry_interval).min(deadline);
        let _ = tokio::time::timeout_at(wake_at, notified).await;
    }
}
