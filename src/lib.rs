//! Hound-Relay: intent-driven search dispatch with resilient fetching
//!
//! This crate turns a free-text request ("用Google搜索AI新闻") into a resolved
//! target engine and executes the resulting fetch with retry, bounded
//! concurrency, and rotating client identities.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod exec;
pub mod intent;
pub mod stealth;

use thiserror::Error;

/// Main error type for Hound-Relay operations
///
/// Fetch failures are never surfaced through this type once they reach the
/// retry layer; they become [`exec::RetryOutcome`] values instead.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: String, value: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("No enabled search engine is configured")]
    NoEngineAvailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),
}

/// Result type alias for Hound-Relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{plan_search, Dispatcher, SearchPlan};
pub use engine::SearchEngine;
pub use exec::{execute_with_retry, ConcurrencyLimiter, RetryOutcome, RetryPolicy};
pub use intent::{recommend_engine, resolve, EngineSelectionMode, IntentType, UserIntent};
pub use stealth::{GeoLocation, Identity, IdentityPool};
