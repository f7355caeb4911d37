//! Keyword policy tables
//!
//! All tables are lowercase; matching happens against the lowercased input.
//! Table order is significant wherever "first match wins".

use crate::engine::SearchEngine;
use crate::intent::types::{ContentType, IntentType, Language};

/// Explicit engine mentions, scanned in this order
pub const ENGINE_ALIASES: &[(SearchEngine, &[&str])] = &[
    (
        SearchEngine::Google,
        &[
            "google", "谷歌", "用google", "用谷歌", "google搜索", "谷歌搜索", "在google",
            "在谷歌", "通过google", "通过谷歌",
        ],
    ),
    (
        SearchEngine::Baidu,
        &[
            "baidu", "百度", "用百度", "百度搜索", "在百度", "通过百度", "用baidu",
            "baidu搜索", "在baidu", "通过baidu",
        ],
    ),
    (
        SearchEngine::Bing,
        &[
            "bing", "必应", "用bing", "用必应", "bing搜索", "必应搜索", "在bing", "在必应",
            "通过bing", "通过必应",
        ],
    ),
    (
        SearchEngine::Yahoo,
        &[
            "yahoo", "雅虎", "用yahoo", "用雅虎", "yahoo搜索", "雅虎搜索", "在yahoo", "在雅虎",
            "通过yahoo", "通过雅虎",
        ],
    ),
    (
        SearchEngine::DuckDuckGo,
        &[
            "duckduckgo", "duck", "ddg", "用duckduckgo", "duckduckgo搜索", "用ddg", "ddg搜索",
        ],
    ),
];

/// Which configured engine a category rule points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRole {
    /// Broad coverage, the usual default
    General,
    /// Strongest scholarly coverage
    Academic,
    /// Does not track users
    Privacy,
    /// Best coverage of domestic Chinese content
    Regional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Academic,
    Privacy,
    Technical,
    Regional,
    News,
}

/// One entry of the implicit engine policy
#[derive(Debug)]
pub struct EngineRule {
    pub category: RuleCategory,
    pub keywords: &'static [&'static str],
    pub role: EngineRole,
    /// When any of these also match, the rule resolves to the regional engine instead
    pub regional_qualifiers: &'static [&'static str],
}

/// Implicit engine policy, evaluated top to bottom, first match wins
pub const ENGINE_RULES: &[EngineRule] = &[
    EngineRule {
        category: RuleCategory::Academic,
        keywords: &[
            "学术", "论文", "研究", "paper", "research", "academic", "scholar", "科研", "期刊",
            "文献",
        ],
        role: EngineRole::Academic,
        regional_qualifiers: &[],
    },
    EngineRule {
        category: RuleCategory::Privacy,
        keywords: &["隐私", "匿名", "privacy", "anonymous", "私密", "保护", "安全搜索"],
        role: EngineRole::Privacy,
        regional_qualifiers: &[],
    },
    EngineRule {
        category: RuleCategory::Technical,
        keywords: &[
            "编程", "代码", "技术", "开发", "programming", "coding", "development", "api",
            "github", "教程", "tutorial", "框架", "framework", "库", "library", "算法",
            "algorithm", "数据结构", "机器学习", "人工智能", "软件", "software", "python", "java",
            "javascript", "typescript", "golang", "react", "vue", "node",
            "docker", "kubernetes", "linux", "数据库", "database",
        ],
        role: EngineRole::General,
        regional_qualifiers: &[],
    },
    EngineRule {
        category: RuleCategory::Regional,
        keywords: &[
            "中国新闻", "国内资讯", "本土品牌", "大陆政策", "中文小说", "国产", "内地",
            "中文论坛", "国内网站", "中国公司", "国内服务",
        ],
        role: EngineRole::Regional,
        regional_qualifiers: &[],
    },
    EngineRule {
        category: RuleCategory::News,
        keywords: &["新闻", "资讯", "消息", "news", "breaking", "latest"],
        role: EngineRole::General,
        regional_qualifiers: &["中国新闻", "国内新闻", "大陆新闻"],
    },
];

/// Primary intent keywords; hits are counted per category
pub const INTENT_KEYWORDS: &[(IntentType, &[&str])] = &[
    (
        IntentType::Search,
        &[
            "搜索", "查找", "找", "search", "find", "look for", "搜一下", "查一下", "找一下",
            "搜搜", "查查",
        ],
    ),
    (
        IntentType::Crawl,
        &[
            "爬取", "抓取", "获取", "crawl", "scrape", "fetch", "爬一下", "抓一下", "取一下",
            "爬", "抓",
        ],
    ),
    (
        IntentType::Research,
        &[
            "研究", "分析", "调研", "research", "analyze", "study", "深入了解", "详细分析",
            "全面研究", "调查",
        ],
    ),
    (
        IntentType::Extract,
        &[
            "提取", "导出", "整理", "extract", "export", "organize", "提取数据", "导出数据",
            "整理数据", "获取信息",
        ],
    ),
    (
        IntentType::Monitor,
        &[
            "监控", "跟踪", "观察", "monitor", "track", "watch", "持续关注", "定期检查",
            "实时监控",
        ],
    ),
    (
        IntentType::Compare,
        &["对比", "比较", "compare", "contrast", "vs", "对比分析", "比较分析", "竞品分析"],
    ),
];

pub const CONTENT_TYPE_KEYWORDS: &[(ContentType, &[&str])] = &[
    (ContentType::News, &["新闻", "资讯", "消息", "news", "article"]),
    (
        ContentType::Academic,
        &["论文", "学术", "研究", "paper", "academic", "scholar"],
    ),
    (
        ContentType::Product,
        &["产品", "商品", "价格", "product", "price", "shopping"],
    ),
    (
        ContentType::Social,
        &["社交", "微博", "推特", "social", "twitter", "weibo"],
    ),
    (ContentType::Video, &["视频", "影片", "video", "movie", "film"]),
    (
        ContentType::Image,
        &["图片", "照片", "图像", "image", "photo", "picture"],
    ),
];

pub const LANGUAGE_KEYWORDS: &[(Language, &[&str])] = &[
    (Language::Chinese, &["中文", "中国", "国内", "chinese", "china"]),
    (
        Language::English,
        &["英文", "英语", "国外", "english", "international"],
    ),
    (Language::Japanese, &["日文", "日语", "日本", "japanese", "japan"]),
    (Language::Korean, &["韩文", "韩语", "韩国", "korean", "korea"]),
];

pub const STEALTH_KEYWORDS: &[&str] = &["隐身", "偷偷", "悄悄", "绕过", "避开", "stealth", "anonymous"];

pub const DYNAMIC_KEYWORDS: &[&str] = &["动态", "异步", "等待", "加载", "dynamic", "ajax", "spa"];

pub const BATCH_KEYWORDS: &[&str] = &["批量", "多个", "一批", "batch", "multiple", "bulk"];

/// Verbs stripped from the text before keyword extraction
pub const ACTION_WORDS: &[&str] = &["搜索", "查找", "找", "search", "find", "用", "在", "通过"];

/// Share of CJK characters above which the text counts as Chinese
pub const CJK_RATIO_THRESHOLD: f64 = 0.3;

pub const MAX_KEYWORDS: usize = 5;

/// Returns true if any of `keywords` occurs in `text`
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        let mut all: Vec<&str> = Vec::new();
        for (_, aliases) in ENGINE_ALIASES {
            all.extend_from_slice(aliases);
        }
        for rule in ENGINE_RULES {
            all.extend_from_slice(rule.keywords);
            all.extend_from_slice(rule.regional_qualifiers);
        }
        for (_, words) in INTENT_KEYWORDS {
            all.extend_from_slice(words);
        }

        for word in all {
            assert_eq!(word, word.to_lowercase(), "table entry {word:?} is not lowercase");
        }
    }

    #[test]
    fn test_rule_order() {
        let order: Vec<RuleCategory> = ENGINE_RULES.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                RuleCategory::Academic,
                RuleCategory::Privacy,
                RuleCategory::Technical,
                RuleCategory::Regional,
                RuleCategory::News,
            ]
        );
    }

    #[test]
    fn test_every_engine_has_aliases() {
        for engine in SearchEngine::ALL {
            assert!(ENGINE_ALIASES
                .iter()
                .any(|(e, aliases)| *e == engine && aliases.contains(&engine.as_str())));
        }
    }
}
