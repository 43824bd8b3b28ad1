pub mod errors;
pub mod id;

pub use errors::{ConfigError, FormError, HostError, PanelError};
pub use id::{new_id, FrameId, Nonce, TabId, TOP_LEVEL_FRAME_ID};
