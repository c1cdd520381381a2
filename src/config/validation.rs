use crate::config::types::{ApiConfig, BatchConfig, CacheConfig, Settings};
use crate::ConfigError;
use url::Url;

/// Largest batch accepted; the inspection API allows 600 calls per minute
const MAX_BATCH_SIZE: usize = 500;

/// Validates the entire settings tree
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_cache_config(&settings.cache)?;
    validate_batch_config(&settings.batch)?;
    validate_api_config(&settings.api)?;
    Ok(())
}

/// Validates status cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache dir cannot be empty".to_string(),
        ));
    }

    if config.ttl_days < 1 {
        return Err(ConfigError::Validation(format!(
            "ttl-days must be >= 1, got {}",
            config.ttl_days
        )));
    }

    Ok(())
}

/// Validates batch configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.size < 1 || config.size > MAX_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "batch size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, config.size
        )));
    }

    Ok(())
}

/// Validates API endpoints and client settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    for (name, endpoint) in [
        ("inspection-endpoint", &config.inspection_endpoint),
        ("indexing-endpoint", &config.indexing_endpoint),
        ("webmasters-endpoint", &config.webmasters_endpoint),
        ("token-endpoint", &config.token_endpoint),
    ] {
        validate_endpoint(name, endpoint)?;
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "max-retries must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates that an endpoint is an absolute http(s) URL
fn validate_endpoint(name: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", name, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, endpoint
        )));
    }

    Ok(())
}
