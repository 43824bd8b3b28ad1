//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod forwarding;
mod origins;
mod system;

pub use forwarding::*;
pub use origins::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for the background process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackgroundConfig {
    pub forwarding: ForwardingConfig,
    pub origins: OriginsConfig,
    pub logging: LoggingConfig,
}
