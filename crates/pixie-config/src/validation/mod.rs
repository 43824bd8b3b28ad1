//! Configuration validation.
//!
//! Collects every violation into a single `ConfigError`.

mod helpers;


use crate::schema::BackgroundConfig;
use pixie_common::ConfigError;

use helpers::validate_range;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &BackgroundConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_forwarding(&mut errors, config);
    validate_origins(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_forwarding(errors: &mut Vec<String>, config: &BackgroundConfig) {
    let forwarding = &config.forwarding;
    validate_range(
        errors,
        "forwarding.retry_interval_ms",
        forwarding.retry_interval_ms,
        1,
        1000,
    );
    validate_range(
        errors,
        "forwarding.max_wait_ms",
        forwarding.max_wait_ms,
        forwarding.retry_interval_ms,
        60_000,
    );
}

fn validate_origins(errors: &mut Vec<String>, config: &BackgroundConfig) {
    if config.origins.allowed_schemes.is_empty() {
        errors.push("origins.allowed_schemes must not be empty".into());
    }
    for host in &config.origins.webstores {
        if host.trim().is_empty() || host.contains('/') {
            errors.push(format!("origins.webstores entry {host:?} is not a hostname"));
        }
    }
}
