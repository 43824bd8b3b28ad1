//! Background coordination for the action panel (sidebar).
//!
//! The toolbar action and the content script ask the background to show,
//! hide or toggle the panel in a tab. The panel frame announces itself with
//! the nonce it was created for, and render notifications from the content
//! script are forwarded to that frame in sequence order:
//! - `SessionStore` holds the per-tab frame binding, nonce and sequence cursor
//! - `wait_frame_id` blocks until a frame is bound or the wait window elapses
//! - `Forwarder` delivers notifications, retrying while the frame is unreachable
//!   and dropping anything older than what the frame already has
//! - `ActionFrameService` exposes the lifecycle operations and messenger dispatch

pub mod barrier;
pub mod forwarder;
pub mod host;
pub mod message;
pub mod origin;
pub mod protocol;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use barrier::wait_frame_id;
pub use forwarder::{Delivery, Forwarder, PanelTimings};
pub use host::{DevtoolsEvent, ErrorReporter, PanelHost, TracingReporter};
pub use message::{FrameMessage, MessageSender, TabInfo, SEQUENCE_META_KEY};
pub use origin::{OriginGuard, OriginVerdict};
pub use protocol::{BackgroundRequest, BackgroundResponse};
pub use service::ActionFrameService;
pub use session::{SessionStore, TabSession};
