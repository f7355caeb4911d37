use crate::intent::types::{EngineSelectionMode, UserIntent};

/// Renders a short human-readable summary of an intent
pub fn explain(intent: &UserIntent) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Primary intent: {} (confidence {:.2})\n",
        intent.primary_intent, intent.confidence
    ));

    if let Some(engine) = intent.search_engine {
        let how = match intent.engine_selection_mode {
            EngineSelectionMode::Explicit => "named by the user",
            EngineSelectionMode::Implicit => "inferred from content",
            EngineSelectionMode::Auto => "default",
        };
        out.push_str(&format!("Search engine: {} ({})\n", engine, how));
    }

    if !intent.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", intent.keywords.join(", ")));
    }

    if let Some(content_type) = intent.content_type {
        out.push_str(&format!("Content type: {}\n", content_type));
    }

    if let Some(language) = intent.language_preference {
        out.push_str(&format!("Language: {}\n", language));
    }

    if !intent.special_needs.is_empty() {
        out.push_str(&format!(
            "Special needs: {}\n",
            intent.special_needs.labels().join(", ")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::resolve;

    #[test]
    fn test_explain_explicit() {
        let text = explain(&resolve("用Google搜索AI新闻"));
        assert!(text.contains("Primary intent: search"));
        assert!(text.contains("Search engine: google (named by the user)"));
        assert!(text.contains("Keywords: AI新闻"));
        assert!(text.contains("Content type: news"));
    }

    #[test]
    fn test_explain_omits_empty_sections() {
        let text = explain(&resolve(""));
        assert!(text.contains("(default)"));
        assert!(!text.contains("Keywords"));
        assert!(!text.contains("Special needs"));
    }

    #[test]
    fn test_explain_lists_special_needs() {
        let text = explain(&resolve("stealth batch crawl"));
        assert!(text.contains("Special needs: stealth, batch"));
    }

    #[test]
    fn test_explain_one_line_per_section() {
        let text = explain(&resolve("用百度搜索英文学术论文"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Search engine: baidu (named by the user)");
        assert!(lines.contains(&"Content type: academic"));
        assert!(lines.contains(&"Language: english"));
        assert!(text.ends_with('\n'));
    }
}
