use crate::engine::SearchEngine;
use serde::Serialize;
use std::fmt;

/// What the user wants done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Search,
    Crawl,
    Research,
    Extract,
    Monitor,
    Compare,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Crawl => "crawl",
            Self::Research => "research",
            Self::Extract => "extract",
            Self::Monitor => "monitor",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the search engine was chosen
///
/// `Explicit` and `Implicit` are binding on the dispatcher; `Auto` is a soft
/// default it may replace with its own tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineSelectionMode {
    /// The text names the engine
    Explicit,
    /// Inferred from a content-category rule
    Implicit,
    /// Nothing matched; general-purpose default
    Auto,
}

impl EngineSelectionMode {
    /// Returns true if downstream components must not replace the engine
    pub fn is_binding(&self) -> bool {
        matches!(self, Self::Explicit | Self::Implicit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Implicit => "implicit",
            Self::Auto => "auto",
        }
    }
}

impl fmt::Display for EngineSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of the requested content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Academic,
    Product,
    Social,
    Video,
    Image,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Academic => "academic",
            Self::Product => "product",
            Self::Social => "social",
            Self::Video => "video",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Chinese,
    English,
    Japanese,
    Korean,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chinese => "chinese",
            Self::English => "english",
            Self::Japanese => "japanese",
            Self::Korean => "korean",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Special handling flags requested by the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecialNeeds {
    /// Rotate identities and avoid fingerprint repetition
    pub stealth: bool,
    /// Page content is rendered client-side
    pub dynamic_content: bool,
    /// Several targets in one request
    pub batch: bool,
}

impl SpecialNeeds {
    pub fn is_empty(&self) -> bool {
        !(self.stealth || self.dynamic_content || self.batch)
    }

    /// Names of the set flags, in a stable order
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.stealth {
            labels.push("stealth");
        }
        if self.dynamic_content {
            labels.push("dynamic_content");
        }
        if self.batch {
            labels.push("batch");
        }
        labels
    }
}

/// Structured result of resolving one free-text request
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserIntent {
    pub primary_intent: IntentType,

    /// Keyword-hit density in [0, 1]; not a calibrated probability
    pub confidence: f64,

    pub search_engine: Option<SearchEngine>,
    pub engine_selection_mode: EngineSelectionMode,

    /// Residual query terms, at most five
    pub keywords: Vec<String>,

    pub content_type: Option<ContentType>,
    pub language_preference: Option<Language>,
    pub special_needs: SpecialNeeds,

    /// The text as received
    pub raw_input: String,

    /// Lowercase word tokens of the input
    pub tokens: Vec<String>,
}
