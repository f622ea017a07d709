use crate::config::types::{Config, FetcherSettings, ServerConfig};
use crate::ConfigError;
use std::net::IpAddr;

/// Longest fetch deadline accepted, in milliseconds
const MAX_TIMEOUT_MS: u64 = 120_000;

/// Smallest body cap that still leaves room for a typical `<head>`
const MIN_BODY_BYTES: usize = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_fetcher_settings(&config.fetcher)?;
    Ok(())
}

/// Validates listener configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<IpAddr>().map_err(|_| {
        ConfigError::Validation(format!(
            "bind_address must be an IP address, got '{}'",
            config.bind_address
        ))
    })?;

    Ok(())
}

/// Validates outbound fetch settings
fn validate_fetcher_settings(config: &FetcherSettings) -> Result<(), ConfigError> {
    if config.timeout_ms < 1 || config.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout_ms must be between 1 and {}, got {}",
            MAX_TIMEOUT_MS, config.timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.max_body_bytes < MIN_BODY_BYTES {
        return Err(ConfigError::Validation(format!(
            "max_body_bytes must be >= {}, got {}",
            MIN_BODY_BYTES, config.max_body_bytes
        )));
    }

    Ok(())
}
