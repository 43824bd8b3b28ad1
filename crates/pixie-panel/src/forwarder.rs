//! Ordered delivery of notifications to a tab's panel frame.
//!
//! Notifications come from producers whose ordering is not guaranteed, so
//! every message carries a caller-assigned sequence number. Only the latest
//! state matters to the panel: a message at or below what the frame already
//! received, or below one still being sent, is dropped instead of delivered.
//! No lock is held while the host sends.

use std::sync::Arc;
use std::time::Duration;

use pixie_common::{PanelError, TabId};
use pixie_config::ForwardingConfig;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::barrier::wait_frame_id;
use crate::host::PanelHost;
use crate::message::FrameMessage;
use crate::session::SessionStore;

/// Poll/backoff interval and overall wait window for frame delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTimings {
    pub retry_interval: Duration,
    pub max_wait: Duration,
}

impl Default for PanelTimings {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_millis(50),
            max_wait: Duration::from_millis(3000),
        }
    }
}

impl From<&ForwardingConfig> for PanelTimings {
    fn from(config: &ForwardingConfig) -> Self {
        Self {
            retry_interval: config.retry_interval(),
            max_wait: config.max_wait(),
        }
    }
}

/// Outcome of a forwarding attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// A message numbered `current` already reached the frame.
    Dropped { current: u64 },
}

#[derive(Clone)]
pub struct Forwarder {
    store: SessionStore,
    host: Arc<dyn PanelHost>,
    timings: PanelTimings,
}

impl Forwarder {
    pub fn new(store: SessionStore, host: Arc<dyn PanelHost>, timings: PanelTimings) -> Self {
        Self {
            store,
            host,
            timings,
        }
    }

    pub fn timings(&self) -> PanelTimings {
        self.timings
    }

    /// Send `message` to the panel frame of `tab_id` once it is ready.
    ///
    /// Retries while the frame is unreachable, for at most `max_wait`. Any
    /// other host error is returned immediately.
    pub async fn forward_when_ready(
        &self,
        tab_id: TabId,
        seq: u64,
        message: FrameMessage,
    ) -> Result<Delivery, PanelError> {
        let frame_id = wait_frame_id(&self.store, tab_id, self.timings).await?;

        let message = message.with_sequence(seq);
        debug!(%tab_id, %frame_id, seq, kind = %message.kind, "forwarding message to action frame");

        // The host call itself runs under the same deadline, so a stalled
        // send cannot outlive the wait window.
        let deadline = Instant::now() + self.timings.max_wait;
        loop {
            if let Err(current) = self.store.claim_delivery(tab_id, seq).await {
                warn!(%tab_id, current, seq, "skipping stale message");
                return Ok(Delivery::Dropped { current });
            }

            let sent = tokio::time::timeout_at(
                deadline,
                self.host.send_to_frame(tab_id, frame_id, &message),
            )
            .await;
            match sent {
                Ok(Ok(())) => {
                    self.store.finish_delivery(tab_id, seq, true).await;
                    debug!(%tab_id, seq, kind = %message.kind, "forwarded message to action frame");
                    return Ok(Delivery::Delivered);
                }
                Ok(Err(e)) if e.is_unreachable() => {
                    debug!(%tab_id, seq, error = %e, "action frame unreachable, retrying");
                }
                Ok(Err(e)) => {
                    self.store.finish_delivery(tab_id, seq, false).await;
                    return Err(e.into());
                }
                Err(_) => {
                    warn!(%tab_id, seq, "send to action frame stalled past deadline");
                    break;
                }
            }

            tokio::time::sleep(self.timings.retry_interval).await;
            if Instant::now() >= deadline {
                break;
            }
        }

        self.store.finish_delivery(tab_id, seq, false).await;
        Err(PanelError::DeliveryTimeout {
            tab_id,
            timeout: self.timings.max_wait,
        })
    }
}
