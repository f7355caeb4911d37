use crate::config::IdentityConfig;
use crate::stealth::agents::{BrowserFamily, RandomAgentSource, UserAgentSource};
use crate::stealth::geo::GeoLocation;
use crate::stealth::history::IdentityHistory;
use crate::stealth::identity::{Identity, SessionConfig, Viewport, DEFAULT_VIEWPORT};
use parking_lot::Mutex;

/// Rotating source of client identities
///
/// The history of issued user agents is the only shared mutable state; it
/// sits behind a mutex so one pool can serve many concurrent tasks.
pub struct IdentityPool {
    source: Box<dyn UserAgentSource>,
    history: Mutex<IdentityHistory>,
    dedup_limit: usize,
    max_regenerations: u32,
    randomize_viewport: bool,
    accept_language: String,
}

impl IdentityPool {
    pub fn new(config: &IdentityConfig) -> Self {
        Self::with_source(config, RandomAgentSource)
    }

    /// Creates a pool drawing user agents from a custom source
    pub fn with_source(config: &IdentityConfig, source: impl UserAgentSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            history: Mutex::new(IdentityHistory::new(
                config.history_capacity,
                config.history_retain,
            )),
            dedup_limit: config.dedup_limit,
            max_regenerations: config.max_regenerations,
            randomize_viewport: config.randomize_viewport,
            accept_language: config.accept_language.clone(),
        }
    }

    /// Produces the next identity, avoiding recently issued user agents
    ///
    /// Candidates are regenerated while they collide with the history and
    /// the history is below the dedup limit. After `max_regenerations`
    /// collisions the duplicate is accepted.
    pub fn next_identity(&self) -> Identity {
        let mut history = self.history.lock();

        let mut candidate = self.source.generate(BrowserFamily::random());
        let mut regenerations = 0;
        while history.contains(&candidate.user_agent) && history.len() < self.dedup_limit {
            if regenerations >= self.max_regenerations {
                tracing::warn!(
                    "No unused user agent after {} regenerations, reusing {}",
                    regenerations,
                    candidate.user_agent
                );
                break;
            }
            candidate = self.source.generate(BrowserFamily::random());
            regenerations += 1;
        }

        history.insert(candidate.user_agent.clone());
        drop(history);

        let viewport = if self.randomize_viewport {
            Viewport::random()
        } else {
            DEFAULT_VIEWPORT
        };

        tracing::debug!(
            "Issued {} identity {}x{}",
            candidate.family,
            viewport.width,
            viewport.height
        );
        Identity::new(candidate, viewport, &self.accept_language)
    }

    pub fn next_location(&self) -> GeoLocation {
        GeoLocation::random()
    }

    /// Fresh identity and location bundled for a fetcher
    pub fn next_session(&self) -> SessionConfig {
        SessionConfig {
            profile: self.next_identity().browser_profile(),
            geolocation: self.next_location(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    pub fn reset_history(&self) {
        self.history.lock().clear();
    }
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self::new(&IdentityConfig::default())
    }
}

impl std::fmt::Debug for IdentityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityPool")
            .field("history_len", &self.history_len())
            .field("dedup_limit", &self.dedup_limit)
            .field("max_regenerations", &self.max_regenerations)
            .finish()
    }
}
