//! Free-text to [`UserIntent`] resolution
//!
//! Engine selection runs in three stages, each consulted only if the previous
//! one found nothing:
//!
//! 1. Explicit mention of an engine by name (binding)
//! 2. Implicit category rules from [`ENGINE_RULES`], first match wins
//! 3. Automatic fallback to the general-purpose engine
//!
//! Every other field is computed independently of engine selection.

use crate::config::PreferencesConfig;
use crate::engine::SearchEngine;
use crate::intent::tables::{
    contains_any, EngineRole, EngineRule, ACTION_WORDS, BATCH_KEYWORDS, CJK_RATIO_THRESHOLD,
    CONTENT_TYPE_KEYWORDS, DYNAMIC_KEYWORDS, ENGINE_ALIASES, ENGINE_RULES, INTENT_KEYWORDS,
    LANGUAGE_KEYWORDS, MAX_KEYWORDS, STEALTH_KEYWORDS,
};
use crate::intent::types::{
    ContentType, EngineSelectionMode, IntentType, Language, SpecialNeeds, UserIntent,
};

/// Maps engine roles to concrete engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnginePreferences {
    pub general: SearchEngine,
    pub academic: SearchEngine,
    pub privacy: SearchEngine,
    pub regional: SearchEngine,
}

impl Default for EnginePreferences {
    fn default() -> Self {
        Self {
            general: SearchEngine::Google,
            academic: SearchEngine::Google,
            privacy: SearchEngine::DuckDuckGo,
            regional: SearchEngine::Baidu,
        }
    }
}

impl From<&PreferencesConfig> for EnginePreferences {
    fn from(config: &PreferencesConfig) -> Self {
        Self {
            general: config.default_engine,
            academic: config.academic_engine,
            privacy: config.privacy_engine,
            regional: config.regional_engine,
        }
    }
}

impl EnginePreferences {
    pub fn engine_for(&self, role: EngineRole) -> SearchEngine {
        match role {
            EngineRole::General => self.general,
            EngineRole::Academic => self.academic,
            EngineRole::Privacy => self.privacy,
            EngineRole::Regional => self.regional,
        }
    }
}

/// Resolves free text into a [`UserIntent`]
///
/// Resolution is total: any string, including the empty one, yields a
/// well-formed intent.
#[derive(Debug, Clone, Default)]
pub struct IntentResolver {
    preferences: EnginePreferences,
}

impl IntentResolver {
    pub fn new(preferences: EnginePreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &EnginePreferences {
        &self.preferences
    }

    /// Resolves `text` into a structured intent
    ///
    /// # Example
    ///
    /// ```
    /// use hound_relay::intent::{EngineSelectionMode, IntentResolver};
    /// use hound_relay::SearchEngine;
    ///
    /// let intent = IntentResolver::default().resolve("用百度搜索英文学术论文");
    /// assert_eq!(intent.search_engine, Some(SearchEngine::Baidu));
    /// assert_eq!(intent.engine_selection_mode, EngineSelectionMode::Explicit);
    /// ```
    pub fn resolve(&self, text: &str) -> UserIntent {
        let lowered = text.to_lowercase();

        let (engine, mode) = match detect_explicit_engine(&lowered) {
            Some(engine) => (engine, EngineSelectionMode::Explicit),
            None => match self.apply_rules(&lowered) {
                Some(engine) => (engine, EngineSelectionMode::Implicit),
                None => (self.preferences.general, EngineSelectionMode::Auto),
            },
        };

        let (primary_intent, confidence) = classify_primary_intent(&lowered);

        let intent = UserIntent {
            primary_intent,
            confidence,
            search_engine: Some(engine),
            engine_selection_mode: mode,
            keywords: extract_keywords(
                text,
                (mode == EngineSelectionMode::Explicit).then_some(engine),
            ),
            content_type: classify_content_type(&lowered),
            language_preference: detect_language(&lowered),
            special_needs: detect_special_needs(&lowered),
            raw_input: text.to_string(),
            tokens: tokenize(&lowered),
        };

        tracing::debug!(
            engine = %engine,
            mode = %mode,
            intent = %intent.primary_intent,
            confidence = intent.confidence,
            "Resolved intent"
        );

        intent
    }

    /// Evaluates the implicit category rules against lowercased text
    pub fn apply_rules(&self, lowered: &str) -> Option<SearchEngine> {
        ENGINE_RULES
            .iter()
            .find(|rule| contains_any(lowered, rule.keywords))
            .map(|rule| self.rule_engine(rule, lowered))
    }

    fn rule_engine(&self, rule: &EngineRule, lowered: &str) -> SearchEngine {
        if contains_any(lowered, rule.regional_qualifiers) {
            self.preferences.regional
        } else {
            self.preferences.engine_for(rule.role)
        }
    }

    /// Suggests an engine for an already-resolved intent
    ///
    /// Explicit and implicit selections are returned unchanged. For automatic
    /// selections the category rules are re-applied to the raw input, then the
    /// intent's content, stealth, and language signals are consulted.
    pub fn recommend(&self, intent: &UserIntent) -> SearchEngine {
        if intent.engine_selection_mode.is_binding() {
            if let Some(engine) = intent.search_engine {
                return engine;
            }
        }

        if let Some(engine) = self.apply_rules(&intent.raw_input.to_lowercase()) {
            return engine;
        }

        match (intent.content_type, intent.language_preference) {
            (Some(ContentType::Academic), _) => self.preferences.academic,
            _ if intent.special_needs.stealth => self.preferences.privacy,
            (Some(ContentType::News), Some(Language::Chinese)) => self.preferences.regional,
            _ => self.preferences.general,
        }
    }
}

/// Resolves `text` with the default engine preferences
pub fn resolve(text: &str) -> UserIntent {
    IntentResolver::default().resolve(text)
}

/// Suggests an engine for `intent` with the default engine preferences
pub fn recommend_engine(intent: &UserIntent) -> SearchEngine {
    IntentResolver::default().recommend(intent)
}

/// Finds the first engine alias in table order
fn detect_explicit_engine(lowered: &str) -> Option<SearchEngine> {
    ENGINE_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| contains_alias(lowered, alias)))
        .map(|(engine, _)| *engine)
}

/// Substring match that refuses to start inside an ASCII word
///
/// "bing" is found in "bingchat" but not in "climbing".
fn contains_alias(lowered: &str, alias: &str) -> bool {
    alias_positions(lowered, alias).next().is_some()
}

/// Byte offsets of `alias` in `lowered` that begin at a word start
fn alias_positions<'a>(lowered: &'a str, alias: &'a str) -> impl Iterator<Item = usize> + 'a {
    let starts_ascii = alias
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());

    lowered
        .match_indices(alias)
        .map(|(start, _)| start)
        .filter(move |&start| {
            !starts_ascii
                || !lowered[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_ascii_alphanumeric())
        })
}

/// Counts keyword hits per intent category
///
/// The highest count wins; a tie between categories resolves to `Search`.
fn classify_primary_intent(lowered: &str) -> (IntentType, f64) {
    let scores: Vec<(IntentType, usize)> = INTENT_KEYWORDS
        .iter()
        .map(|(intent, words)| (*intent, words.iter().filter(|w| lowered.contains(*w)).count()))
        .collect();

    let max_hits = scores.iter().map(|(_, hits)| *hits).max().unwrap_or(0);
    if max_hits == 0 {
        return (IntentType::Search, 0.5);
    }

    let mut leaders = scores.iter().filter(|(_, hits)| *hits == max_hits);
    let intent = match (leaders.next(), leaders.next()) {
        (Some((intent, _)), None) => *intent,
        _ => IntentType::Search,
    };

    (intent, (max_hits as f64 / 3.0).min(1.0))
}

fn classify_content_type(lowered: &str) -> Option<ContentType> {
    CONTENT_TYPE_KEYWORDS
        .iter()
        .find(|(_, words)| contains_any(lowered, words))
        .map(|(content_type, _)| *content_type)
}

/// Keyword lookup first, then the share of CJK characters
fn detect_language(lowered: &str) -> Option<Language> {
    if let Some((language, _)) = LANGUAGE_KEYWORDS
        .iter()
        .find(|(_, words)| contains_any(lowered, words))
    {
        return Some(*language);
    }

    let total = lowered.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return None;
    }

    let cjk = lowered
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count();

    if cjk as f64 / total as f64 > CJK_RATIO_THRESHOLD {
        Some(Language::Chinese)
    } else {
        None
    }
}

fn detect_special_needs(lowered: &str) -> SpecialNeeds {
    SpecialNeeds {
        stealth: contains_any(lowered, STEALTH_KEYWORDS),
        dynamic_content: contains_any(lowered, DYNAMIC_KEYWORDS),
        batch: contains_any(lowered, BATCH_KEYWORDS),
    }
}

/// Strips engine aliases and action verbs, then keeps up to five multi-character words
///
/// `mentioned` is the engine the text named explicitly, if any. Only its
/// aliases are removed, and only where detection would have matched them.
fn extract_keywords(text: &str, mentioned: Option<SearchEngine>) -> Vec<String> {
    let mut cleaned = text.to_string();

    if let Some(engine) = mentioned {
        if let Some((_, aliases)) = ENGINE_ALIASES.iter().find(|(e, _)| *e == engine) {
            let mut aliases: Vec<&str> = aliases.to_vec();
            // Longest first so "用google" goes before "google" leaves a stray "用"
            aliases.sort_by_key(|a| std::cmp::Reverse(a.len()));
            for alias in aliases {
                cleaned = strip_alias(&cleaned, alias);
            }
        }
    }

    for word in ACTION_WORDS {
        cleaned = remove_ignore_ascii_case(&cleaned, word);
    }

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Removes the occurrences of a lowercase alias that [`contains_alias`] accepts
fn strip_alias(text: &str, alias: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `text`
    let haystack = text.to_ascii_lowercase();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for start in alias_positions(&haystack, alias) {
        out.push_str(&text[last..start]);
        last = start + alias.len();
    }
    out.push_str(&text[last..]);
    out
}

/// Removes every occurrence of `needle`, ignoring ASCII case
fn remove_ignore_ascii_case(text: &str, needle: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }

    // ASCII lowercasing keeps byte offsets identical to `text`
    let haystack = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, _) in haystack.match_indices(needle.as_str()) {
        out.push_str(&text[last..idx]);
        last = idx + needle.len();
    }
    out.push_str(&text[last..]);
    out
}

fn tokenize(lowered: &str) -> Vec<String> {
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
