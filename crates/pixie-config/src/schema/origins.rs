use serde::{Deserialize, Serialize};

/// Pages the toolbar action refuses to inject into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginsConfig {
    /// Extension store hostnames. Browsers forbid content scripts there.
    pub webstores: Vec<String>,
    /// URL schemes the panel can be shown on.
    pub allowed_schemes: Vec<String>,
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self {
            webstores: vec!["chrome.google.com".into(), "addons.mozilla.org".into()],
            allowed_schemes: vec!["http".into(), "https".into()],
        }
    }
}
