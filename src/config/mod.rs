//! Configuration module for Hound-Relay
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file (or no file at all) yields the
//! built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use hound_relay::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hound.toml")).unwrap();
//! println!("Retries per fetch: {}", config.retry.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ConcurrencyConfig, Config, FetchConfig, IdentityConfig, PreferencesConfig, RetryConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
