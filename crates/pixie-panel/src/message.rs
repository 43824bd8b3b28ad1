//! Message shapes exchanged with the content script and the panel frame.

use pixie_common::{FrameId, TabId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the forwarding sequence number.
pub const SEQUENCE_META_KEY: &str = "$seq";

/// A serializable notification for the panel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub payload: Value,
}

impl FrameMessage {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            meta: Map::new(),
            payload,
        }
    }

    /// Copy of this message with `seq` recorded in its metadata.
    pub fn with_sequence(mut self, seq: u64) -> Self {
        self.meta.insert(SEQUENCE_META_KEY.to_string(), Value::from(seq));
        self
    }

    pub fn sequence(&self) -> Option<u64> {
        self.meta.get(SEQUENCE_META_KEY).and_then(Value::as_u64)
    }
}

/// The context a messenger call originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub tab_id: TabId,
    pub frame_id: FrameId,
}

/// The tab the toolbar action was clicked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}
