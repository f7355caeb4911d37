//! Intent resolution
//!
//! Turns a free-text request into a [`UserIntent`]: the primary action, the
//! target search engine and how it was chosen, residual keywords, and a few
//! classification tags.
//!
//! # Example
//!
//! ```
//! use hound_relay::intent::{resolve, EngineSelectionMode, IntentType};
//! use hound_relay::SearchEngine;
//!
//! let intent = resolve("用Google搜索AI新闻");
//! assert_eq!(intent.search_engine, Some(SearchEngine::Google));
//! assert_eq!(intent.engine_selection_mode, EngineSelectionMode::Explicit);
//! assert_eq!(intent.primary_intent, IntentType::Search);
//! ```

mod explain;
mod resolver;
pub mod tables;
mod types;

pub use explain::explain;
pub use resolver::{recommend_engine, resolve, EnginePreferences, IntentResolver};
pub use types::{
    ContentType, EngineSelectionMode, IntentType, Language, SpecialNeeds, UserIntent,
};
