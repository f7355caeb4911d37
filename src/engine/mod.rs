//! Search engine identifiers and endpoint handling
//!
//! The five supported engines have stable lowercase identifiers that are
//! used in configuration files, intent records, and CLI output.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A supported search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Google,
    Baidu,
    Bing,
    Yahoo,
    DuckDuckGo,
}

impl SearchEngine {
    /// All engines in explicit-detection order
    pub const ALL: [SearchEngine; 5] = [
        SearchEngine::Google,
        SearchEngine::Baidu,
        SearchEngine::Bing,
        SearchEngine::Yahoo,
        SearchEngine::DuckDuckGo,
    ];

    /// Returns the stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Baidu => "baidu",
            Self::Bing => "bing",
            Self::Yahoo => "yahoo",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    /// Returns the built-in endpoint for this engine
    pub fn default_endpoint(&self) -> EngineEndpoint {
        let (base_url, query_param, priority) = match self {
            Self::Google => ("https://www.google.com/search", "q", 1),
            Self::Baidu => ("https://www.baidu.com/s", "wd", 2),
            Self::Bing => ("https://www.bing.com/search", "q", 3),
            Self::Yahoo => ("https://search.yahoo.com/search", "p", 4),
            Self::DuckDuckGo => ("https://duckduckgo.com/", "q", 5),
        };

        EngineEndpoint {
            base_url: base_url.to_string(),
            query_param: query_param.to_string(),
            enabled: true,
            priority,
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "baidu" => Ok(Self::Baidu),
            "bing" => Ok(Self::Bing),
            "yahoo" => Ok(Self::Yahoo),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }
}

/// Where and how to query a search engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineEndpoint {
    /// Base search URL without the query string
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Name of the query-string parameter carrying the search text
    #[serde(rename = "query-param")]
    pub query_param: String,

    /// Disabled engines are skipped by automatic selection only
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Lower values win automatic tie-breaks
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_priority() -> u32 {
    10
}

impl EngineEndpoint {
    /// Builds a percent-encoded search URL for `query`
    ///
    /// # Example
    ///
    /// ```
    /// use hound_relay::engine::SearchEngine;
    ///
    /// let endpoint = SearchEngine::Baidu.default_endpoint();
    /// let url = endpoint.search_url("人工智能 news").unwrap();
    /// assert!(url.as_str().starts_with("https://www.baidu.com/s?wd="));
    /// ```
    pub fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut().append_pair(&self.query_param, query);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_identifiers() {
        for engine in SearchEngine::ALL {
            assert_eq!(engine.as_str().parse::<SearchEngine>().unwrap(), engine);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Google".parse::<SearchEngine>().unwrap(), SearchEngine::Google);
        assert_eq!("DDG".parse::<SearchEngine>().unwrap(), SearchEngine::DuckDuckGo);
        assert!(matches!(
            "altavista".parse::<SearchEngine>(),
            Err(ConfigError::UnknownEngine(_))
        ));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = SearchEngine::Google
            .default_endpoint()
            .search_url("rust async & tokio")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/search?q=rust+async+%26+tokio"
        );
    }

    #[test]
    fn test_yahoo_uses_p_parameter() {
        let url = SearchEngine::Yahoo
            .default_endpoint()
            .search_url("weather")
            .unwrap();
        assert_eq!(url.query(), Some("p=weather"));
    }

    #[test]
    fn test_default_priorities_are_distinct() {
        let mut priorities: Vec<u32> = SearchEngine::ALL
            .iter()
            .map(|e| e.default_endpoint().priority)
            .collect();
        priorities.dedup();
        assert_eq!(priorities.len(), 5);
    }
}
