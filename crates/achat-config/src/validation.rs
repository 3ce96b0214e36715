//! Config validation.
//!
//! Each section has its own check; `validate` runs them all and collects
//! every problem into a single `ConfigError`.

use achat_common::ConfigError;

use crate::schema::AchatConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_endpoint(&mut errors, config);
    validate_identity(&mut errors, config);
    validate_range(
        &mut errors,
        "transcript.max_messages",
        config.transcript.max_messages,
        1,
        100_000,
    );
    validate_non_empty(&mut errors, "logging.level", &config.logging.level);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_endpoint(errors: &mut Vec<String>, config: &AchatConfig) {
    let url = config.endpoint.url.trim();
    if url.is_empty() {
        errors.push("endpoint.url is empty".into());
    } else if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        errors.push(format!("endpoint.url = {url} must use ws:// or wss://"));
    }
    validate_range(
        errors,
        "endpoint.connect_timeout_secs",
        config.endpoint.connect_timeout_secs,
        1,
        120,
    );
}

fn validate_identity(errors: &mut Vec<String>, config: &AchatConfig) {
    validate_non_empty(errors, "identity.user_uuid", &config.identity.user_uuid);
    validate_non_empty(errors, "identity.from", &config.identity.from);
    validate_non_empty(errors, "identity.pid", &config.identity.pid);
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} is empty"));
    }
}
