use pixie_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("pixiebrix").join("background.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG_TOML: &str = r#"# PixieBrix background configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[forwarding]
# retry_interval_ms = 50     # 1-1000
# max_wait_ms = 3000         # retry_interval_ms-60000

[origins]
# webstores = ["chrome.google.com", "addons.mozilla.org"]
# allowed_schemes = ["http", "https"]

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"#;
