use crate::config::Config;
use crate::engine::SearchEngine;
use crate::intent::{EngineSelectionMode, UserIntent};
use crate::{RelayError, Result};
use serde::Serialize;

/// Concrete search request derived from an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPlan {
    pub engine: SearchEngine,
    pub mode: EngineSelectionMode,
    pub url: String,
    pub query: String,
}

/// Chooses the engine and builds the search URL for `intent`
///
/// Explicit and implicit selections are binding and used even when the
/// engine is disabled in `config`. Automatic selection prefers the intent's
/// engine, then the enabled engine with the lowest priority.
///
/// # Example
///
/// ```
/// use hound_relay::dispatch::plan_search;
/// use hound_relay::{resolve, Config, SearchEngine};
///
/// let intent = resolve("用百度搜索 rust async");
/// let plan = plan_search(&intent, &Config::default()).unwrap();
/// assert_eq!(plan.engine, SearchEngine::Baidu);
/// assert!(plan.url.starts_with("https://www.baidu.com/s?wd="));
/// ```
pub fn plan_search(intent: &UserIntent, config: &Config) -> Result<SearchPlan> {
    let engine = match intent.search_engine {
        Some(engine) if intent.engine_selection_mode.is_binding() => {
            if !config.endpoint(engine).enabled {
                tracing::info!(
                    "{} is disabled but was selected {}ly, using it anyway",
                    engine,
                    intent.engine_selection_mode
                );
            }
            engine
        }
        preferred => auto_engine(preferred.unwrap_or(config.preferences.default_engine), config)?,
    };

    let query = if intent.keywords.is_empty() {
        intent.raw_input.trim().to_string()
    } else {
        intent.keywords.join(" ")
    };

    let url = config.endpoint(engine).search_url(&query)?;

    tracing::debug!("Planned {} search for {:?}: {}", engine, query, url);

    Ok(SearchPlan {
        engine,
        mode: intent.engine_selection_mode,
        url: url.into(),
        query,
    })
}

fn auto_engine(preferred: SearchEngine, config: &Config) -> Result<SearchEngine> {
    if config.endpoint(preferred).enabled {
        return Ok(preferred);
    }

    let fallback = SearchEngine::ALL
        .into_iter()
        .map(|engine| (engine, config.endpoint(engine)))
        .filter(|(_, endpoint)| endpoint.enabled)
        .min_by_key(|(_, endpoint)| endpoint.priority)
        .map(|(engine, _)| engine)
        .ok_or(RelayError::NoEngineAvailable)?;

    tracing::info!("{} is disabled, falling back to {}", preferred, fallback);
    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::intent::resolve;

    #[test]
    fn test_explicit_engine_used_even_if_disabled() {
        let config = parse_config(
            r#"
[engines.bing]
base-url = "https://www.bing.com/search"
query-param = "q"
enabled = false
"#,
        )
        .unwrap();

        let plan = plan_search(&resolve("用Bing搜索天气预报"), &config).unwrap();
        assert_eq!(plan.engine, SearchEngine::Bing);
        assert_eq!(plan.mode, EngineSelectionMode::Explicit);
        assert!(plan.url.starts_with("https://www.bing.com/search?q="));
    }

    #[test]
    fn test_auto_falls_back_by_priority() {
        let config = parse_config(
            r#"
[engines.google]
base-url = "https://www.google.com/search"
query-param = "q"
enabled = false

[engines.yahoo]
base-url = "https://search.yahoo.com/search"
query-param = "p"
priority = 1
"#,
        )
        .unwrap();

        let intent = resolve("hello world");
        assert_eq!(intent.engine_selection_mode, EngineSelectionMode::Auto);

        let plan = plan_search(&intent, &config).unwrap();
        assert_eq!(plan.engine, SearchEngine::Yahoo);
        assert_eq!(plan.query, "hello world");
        assert_eq!(plan.url, "https://search.yahoo.com/search?p=hello+world");
    }

    #[test]
    fn test_no_enabled_engine() {
        let mut config = Config::default();
        for engine in SearchEngine::ALL {
            let mut endpoint = engine.default_endpoint();
            endpoint.enabled = false;
            config.engines.insert(engine.as_str().to_string(), endpoint);
        }

        let result = plan_search(&resolve("hello world"), &config);
        assert!(matches!(result, Err(RelayError::NoEngineAvailable)));
    }

    #[test]
    fn test_query_falls_back_to_raw_text() {
        let mut intent = resolve("  x  ");
        intent.keywords.clear();

        let plan = plan_search(&intent, &Config::default()).unwrap();
        assert_eq!(plan.query, "x");
    }

    #[test]
    fn test_keywords_become_query() {
        let intent = resolve("用Google搜索AI新闻");
        let plan = plan_search(&intent, &Config::default()).unwrap();
        assert_eq!(plan.engine, SearchEngine::Google);
        assert_eq!(plan.query, intent.keywords.join(" "));
        assert!(!plan.query.to_lowercase().contains("google"));
    }
}
