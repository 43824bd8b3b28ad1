//! Which pages the toolbar action may inject the panel into.

use pixie_config::OriginsConfig;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginVerdict {
    Supported,
    /// An extension store; browsers block content scripts there.
    Webstore { host: String },
    /// Not a web page (or no usable URL at all).
    UnsupportedScheme { scheme: String },
}

#[derive(Debug, Clone)]
pub struct OriginGuard {
    webstores: Vec<String>,
    allowed_schemes: Vec<String>,
}

impl OriginGuard {
    pub fn new(webstores: Vec<String>, allowed_schemes: Vec<String>) -> Self {
        Self {
            webstores: webstores.into_iter().map(|h| h.to_ascii_lowercase()).collect(),
            allowed_schemes: allowed_schemes
                .into_iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn check(&self, url: Option<&str>) -> OriginVerdict {
        let Some(parsed) = url.and_then(|raw| Url::parse(raw).ok()) else {
            return OriginVerdict::UnsupportedScheme {
                scheme: String::new(),
            };
        };

        if let Some(host) = parsed.host_str() {
            if self.webstores.iter().any(|w| w == host) {
                return OriginVerdict::Webstore {
                    host: host.to_string(),
                };
            }
        }

        if !self.allowed_schemes.iter().any(|s| s == parsed.scheme()) {
            return OriginVerdict::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            };
        }

        OriginVerdict::Supported
    }
}

impl Default for OriginGuard {
    fn default() -> Self {
        Self::from(&OriginsConfig::default())
    }
}

impl From<&OriginsConfig> for OriginGuard {
    fn from(config: &OriginsConfig) -> Self {
        Self::new(config.webstores.clone(), config.allowed_schemes.clone())
    }
}
