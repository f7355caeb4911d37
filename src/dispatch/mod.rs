//! Search dispatch
//!
//! Glues the pieces together: resolve text into an intent, plan the search
//! URL, draw an identity, and fetch through the retry executor. Batches of
//! URLs go through the concurrency limiter as well.

mod fetcher;
mod planner;

pub use fetcher::{Fetcher, HttpFetcher, Page};
pub use planner::{plan_search, SearchPlan};

use crate::config::Config;
use crate::exec::{execute_with_retry, ConcurrencyLimiter, RetryOutcome, RetryPolicy, TaskFailure};
use crate::intent::{EnginePreferences, IntentResolver, Language, UserIntent};
use crate::stealth::{IdentityPool, SessionConfig};
use crate::Result;
use std::sync::Arc;
use tokio::time::Instant;

/// `accept-language` sent when the request is in Chinese
pub const CHINESE_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Everything a single search produced
#[derive(Debug)]
pub struct SearchResponse {
    pub intent: UserIntent,
    pub plan: SearchPlan,
    pub outcome: RetryOutcome<Page>,
}

pub struct Dispatcher {
    config: Config,
    resolver: IntentResolver,
    identities: Arc<IdentityPool>,
    policy: RetryPolicy,
    limiter: ConcurrencyLimiter,
    fetcher: Arc<dyn Fetcher>,
}

impl Dispatcher {
    /// Creates a dispatcher fetching over plain HTTP
    pub fn new(config: Config) -> Self {
        let fetcher = HttpFetcher::new(&config.fetch);
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            resolver: IntentResolver::new(EnginePreferences::from(&config.preferences)),
            identities: Arc::new(IdentityPool::new(&config.identity)),
            policy: RetryPolicy::from(&config.retry),
            limiter: ConcurrencyLimiter::from(&config.concurrency),
            fetcher,
            config,
        }
    }

    /// Replaces the retry policy built from the config
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identities(&self) -> &IdentityPool {
        &self.identities
    }

    pub fn resolve(&self, text: &str) -> UserIntent {
        self.resolver.resolve(text)
    }

    /// Resolves `text` and plans the search without fetching
    pub fn plan(&self, text: &str) -> Result<(UserIntent, SearchPlan)> {
        let intent = self.resolver.resolve(text);
        let plan = plan_search(&intent, &self.config)?;
        Ok((intent, plan))
    }

    /// Resolves, plans, and fetches one search
    ///
    /// Fetch failures are reported in the outcome, never as `Err`.
    pub async fn search(&self, text: &str) -> Result<SearchResponse> {
        let (intent, plan) = self.plan(text)?;
        let session = self.session_for(Some(&intent));

        tracing::info!(
            "Searching {} ({} selection) for {:?}",
            plan.engine,
            plan.mode,
            plan.query
        );

        let fetcher = &self.fetcher;
        let url = plan.url.as_str();
        let outcome = execute_with_retry(&self.policy, self.deadline(), || {
            fetcher.fetch(url, &session)
        })
        .await;

        if let Some(message) = outcome.failure_message() {
            tracing::warn!("Search failed: {}", message);
        }

        Ok(SearchResponse {
            intent,
            plan,
            outcome,
        })
    }

    /// Fetches every URL with retry and bounded concurrency
    ///
    /// Results line up with `urls`. Each URL gets its own identity.
    pub async fn fetch_all(
        &self,
        urls: &[String],
    ) -> Vec<std::result::Result<RetryOutcome<Page>, TaskFailure>> {
        let deadline = self.deadline();

        let tasks: Vec<_> = urls
            .iter()
            .map(|url| {
                let url = url.clone();
                let session = self.session_for(None);
                let fetcher = Arc::clone(&self.fetcher);
                let policy = self.policy.clone();
                async move {
                    execute_with_retry(&policy, deadline, || fetcher.fetch(&url, &session)).await
                }
            })
            .collect();

        let results = self.limiter.run_bounded(tasks, deadline).await;

        let succeeded = results
            .iter()
            .filter(|r| matches!(r, Ok(outcome) if outcome.is_success()))
            .count();
        tracing::info!("Fetched {}/{} URLs", succeeded, urls.len());

        results
    }

    /// Draws a session, adjusting `accept-language` to the intent's language
    fn session_for(&self, intent: Option<&UserIntent>) -> SessionConfig {
        let mut identity = self.identities.next_identity();
        if intent.and_then(|i| i.language_preference) == Some(Language::Chinese) {
            identity = identity.with_accept_language(CHINESE_ACCEPT_LANGUAGE);
        }

        SessionConfig {
            profile: identity.browser_profile(),
            geolocation: self.identities.next_location(),
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.config
            .concurrency
            .deadline()
            .map(|budget| Instant::now() + budget)
    }
}
