use crate::config::types::{ConcurrencyConfig, Config, IdentityConfig, RetryConfig};
use crate::engine::{EngineEndpoint, SearchEngine};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_retry_config(&config.retry)?;
    validate_concurrency_config(&config.concurrency)?;
    validate_identity_config(&config.identity)?;
    validate_fetch_config(config)?;
    for (name, endpoint) in &config.engines {
        let engine: SearchEngine = name.parse()?;
        if engine.as_str() != name {
            return Err(ConfigError::Validation(format!(
                "engine table key '{}' must be written as '{}'",
                name, engine
            )));
        }
        validate_endpoint(engine, endpoint)?;
    }
    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "base_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates concurrency configuration
fn validate_concurrency_config(config: &ConcurrencyConfig) -> Result<(), ConfigError> {
    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    if config.deadline_secs == Some(0) {
        return Err(ConfigError::Validation(
            "deadline_secs must be positive when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates identity pool configuration
fn validate_identity_config(config: &IdentityConfig) -> Result<(), ConfigError> {
    if config.history_capacity == 0 {
        return Err(ConfigError::Validation(
            "history_capacity must be positive".to_string(),
        ));
    }

    if config.history_retain >= config.history_capacity {
        return Err(ConfigError::Validation(format!(
            "history_retain ({}) must be smaller than history_capacity ({})",
            config.history_retain, config.history_capacity
        )));
    }

    if config.dedup_limit > config.history_capacity {
        return Err(ConfigError::Validation(format!(
            "dedup_limit ({}) must not exceed history_capacity ({})",
            config.dedup_limit, config.history_capacity
        )));
    }

    if config.max_regenerations < 1 {
        return Err(ConfigError::Validation(
            "max_regenerations must be >= 1".to_string(),
        ));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept_language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_fetch_config(config: &Config) -> Result<(), ConfigError> {
    if config.fetch.timeout_secs == 0 || config.fetch.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch timeouts must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Validates a single engine endpoint
fn validate_endpoint(engine: SearchEngine, endpoint: &EngineEndpoint) -> Result<(), ConfigError> {
    let url = Url::parse(&endpoint.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_url for {}: {}", engine, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base_url for {} must use http or https, got '{}'",
            engine,
            url.scheme()
        )));
    }

    if endpoint.query_param.is_empty() {
        return Err(ConfigError::Validation(format!(
            "query_param for {} cannot be empty",
            engine
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_retain_must_be_below_capacity() {
        let mut config = Config::default();
        config.identity.history_retain = config.identity.history_capacity;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_base_delay_above_cap_is_rejected() {
        let mut config = Config::default();
        config.retry.base_delay_ms = 20_000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut endpoint = SearchEngine::Google.default_endpoint();
        assert!(validate_endpoint(SearchEngine::Google, &endpoint).is_ok());

        endpoint.base_url = "ftp://example.com/search".to_string();
        assert!(matches!(
            validate_endpoint(SearchEngine::Google, &endpoint),
            Err(ConfigError::Validation(_))
        ));

        endpoint.base_url = "not a url".to_string();
        assert!(matches!(
            validate_endpoint(SearchEngine::Google, &endpoint),
            Err(ConfigError::InvalidUrl(_))
        ));

        endpoint.base_url = "https://example.com/search".to_string();
        endpoint.query_param = String::new();
        assert!(validate_endpoint(SearchEngine::Google, &endpoint).is_err());
    }

    #[test]
    fn test_unknown_engine_table_is_rejected() {
        let mut config = Config::default();
        config
            .engines
            .insert("altavista".to_string(), SearchEngine::Google.default_endpoint());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::UnknownEngine(_))
        ));
    }

    #[test]
    fn test_zero_deadline_is_rejected() {
        let mut config = Config::default();
        config.concurrency.deadline_secs = Some(0);
        assert!(validate(&config).is_err());
    }
}
