use crate::engine::{EngineEndpoint, SearchEngine};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for Hound-Relay
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    /// Endpoint overrides keyed by engine identifier
    #[serde(default)]
    pub engines: BTreeMap<String, EngineEndpoint>,
}

impl Config {
    /// Returns the configured endpoint for `engine`, falling back to the built-in one
    pub fn endpoint(&self, engine: SearchEngine) -> EngineEndpoint {
        self.engines
            .get(engine.as_str())
            .cloned()
            .unwrap_or_else(|| engine.default_endpoint())
    }
}

/// Retry and back-off configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay for exponential back-off (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound of the uniform random jitter added to each delay (milliseconds)
    #[serde(rename = "jitter-ms", default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Cap on a single back-off sleep (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            jitter_ms: default_jitter_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Bounded concurrency configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencyConfig {
    /// Maximum number of in-flight fetches
    #[serde(rename = "max-concurrent", default = "default_max_concurrent")]
    pub max_concurrent: u32,

    /// Optional deadline for a whole batch (seconds)
    #[serde(rename = "deadline-secs", default)]
    pub deadline_secs: Option<u64>,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            deadline_secs: None,
        }
    }
}

impl ConcurrencyConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Identity pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// History size that triggers eviction
    #[serde(rename = "history-capacity", default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Number of most recent entries kept after eviction
    #[serde(rename = "history-retain", default = "default_history_retain")]
    pub history_retain: usize,

    /// Duplicates are only regenerated while the history is smaller than this
    #[serde(rename = "dedup-limit", default = "default_dedup_limit")]
    pub dedup_limit: usize,

    /// Maximum regenerations before a duplicate is accepted
    #[serde(rename = "max-regenerations", default = "default_max_regenerations")]
    pub max_regenerations: u32,

    /// Pick a random common resolution instead of 1920x1080
    #[serde(rename = "randomize-viewport", default = "default_true")]
    pub randomize_viewport: bool,

    /// Accept-Language header sent with every identity
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            history_retain: default_history_retain(),
            dedup_limit: default_dedup_limit(),
            max_regenerations: default_max_regenerations(),
            randomize_viewport: true,
            accept_language: default_accept_language(),
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Engine preferences used by implicit and automatic selection
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    #[serde(rename = "default-engine", default = "default_general_engine")]
    pub default_engine: SearchEngine,

    #[serde(rename = "academic-engine", default = "default_general_engine")]
    pub academic_engine: SearchEngine,

    #[serde(rename = "privacy-engine", default = "default_privacy_engine")]
    pub privacy_engine: SearchEngine,

    #[serde(rename = "regional-engine", default = "default_regional_engine")]
    pub regional_engine: SearchEngine,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            default_engine: default_general_engine(),
            academic_engine: default_general_engine(),
            privacy_engine: default_privacy_engine(),
            regional_engine: default_regional_engine(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_jitter_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_max_concurrent() -> u32 {
    5
}

fn default_history_capacity() -> usize {
    100
}

fn default_history_retain() -> usize {
    50
}

fn default_dedup_limit() -> usize {
    50
}

fn default_max_regenerations() -> u32 {
    16
}

fn default_true() -> bool {
    true
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9,zh-CN;q=0.8,zh;q=0.7".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_general_engine() -> SearchEngine {
    SearchEngine::Google
}

fn default_privacy_engine() -> SearchEngine {
    SearchEngine::DuckDuckGo
}

fn default_regional_engine() -> SearchEngine {
    SearchEngine::Baidu
}
