use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the form frame renders: a JSON Schema plus rendering hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub schema: Value,
    #[serde(default)]
    pub ui_schema: Value,
    #[serde(default = "default_cancelable")]
    pub cancelable: bool,
    #[serde(default = "default_submit_caption")]
    pub submit_caption: String,
}

fn default_cancelable() -> bool {
    true
}

fn default_submit_caption() -> String {
    "Submit".to_string()
}

impl FormDefinition {
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            ui_schema: Value::Null,
            cancelable: default_cancelable(),
            submit_caption: default_submit_caption(),
        }
    }
}
