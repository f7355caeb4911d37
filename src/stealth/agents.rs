//! Desktop user-agent generation with matching client hints

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Browser families the generator can impersonate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Edge,
}

impl BrowserFamily {
    pub const ALL: [BrowserFamily; 2] = [BrowserFamily::Chrome, BrowserFamily::Edge];

    /// Brand name used in `sec-ch-ua`
    pub fn brand(&self) -> &'static str {
        match self {
            Self::Chrome => "Google Chrome",
            Self::Edge => "Microsoft Edge",
        }
    }

    /// Picks one family uniformly
    pub fn random() -> Self {
        if rand::thread_rng().gen_bool(0.5) {
            Self::Chrome
        } else {
            Self::Edge
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => f.write_str("chrome"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOs, Platform::Linux];

    /// Platform token inside the user-agent parentheses
    fn ua_token(&self) -> &'static str {
        match self {
            Self::Windows => "Windows NT 10.0; Win64; x64",
            Self::MacOs => "Macintosh; Intel Mac OS X 10_15_7",
            Self::Linux => "X11; Linux x86_64",
        }
    }

    /// Value of `sec-ch-ua-platform`, unquoted
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }
}

/// Structured client hints consistent with one user agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientHints {
    /// (brand, major version) pairs in header order
    pub brands: Vec<(String, String)>,
    pub mobile: bool,
    pub platform: String,
}

impl ClientHints {
    /// Renders the `sec-ch-ua` header value
    pub fn sec_ch_ua(&self) -> String {
        self.brands
            .iter()
            .map(|(brand, version)| format!("\"{}\";v=\"{}\"", brand, version))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn sec_ch_ua_mobile(&self) -> &'static str {
        if self.mobile {
            "?1"
        } else {
            "?0"
        }
    }

    pub fn sec_ch_ua_platform(&self) -> String {
        format!("\"{}\"", self.platform)
    }
}

/// A generated user agent together with the data it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAgent {
    pub user_agent: String,
    pub client_hints: ClientHints,
    pub family: BrowserFamily,
    pub platform: Platform,
    pub major_version: u32,
}

/// Source of candidate user agents for the identity pool
pub trait UserAgentSource: Send + Sync {
    fn generate(&self, family: BrowserFamily) -> GeneratedAgent;
}

/// Recent stable desktop releases as (major, build, patch)
const CHROMIUM_RELEASES: &[(u32, u32, u32)] = &[
    (120, 6099, 225),
    (121, 6167, 184),
    (122, 6261, 128),
    (123, 6312, 122),
    (124, 6367, 207),
    (125, 6422, 141),
    (126, 6478, 126),
    (127, 6533, 119),
    (128, 6613, 137),
    (129, 6668, 100),
    (130, 6723, 116),
    (131, 6778, 85),
];

/// Randomized generator over platforms and recent Chromium releases
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAgentSource;

impl UserAgentSource for RandomAgentSource {
    fn generate(&self, family: BrowserFamily) -> GeneratedAgent {
        let mut rng = rand::thread_rng();
        let platform = *Platform::ALL.choose(&mut rng).unwrap_or(&Platform::Windows);
        let release = *CHROMIUM_RELEASES
            .choose(&mut rng)
            .unwrap_or(&CHROMIUM_RELEASES[0]);
        build_agent(family, platform, release)
    }
}

/// Number of distinct agents [`RandomAgentSource`] can produce
pub fn agent_space_size() -> usize {
    BrowserFamily::ALL.len() * Platform::ALL.len() * CHROMIUM_RELEASES.len()
}

/// Builds a user agent and its client hints from one release tuple
///
/// Both strings reference the same family and major version.
pub fn build_agent(
    family: BrowserFamily,
    platform: Platform,
    (major, build, patch): (u32, u32, u32),
) -> GeneratedAgent {
    let chromium = format!("{}.0.{}.{}", major, build, patch);
    let mut user_agent = format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        platform.ua_token(),
        chromium
    );
    if family == BrowserFamily::Edge {
        user_agent.push_str(&format!(" Edg/{}", chromium));
    }

    let client_hints = ClientHints {
        brands: vec![
            ("Chromium".to_string(), major.to_string()),
            (family.brand().to_string(), major.to_string()),
            ("Not-A.Brand".to_string(), "99".to_string()),
        ],
        mobile: false,
        platform: platform.hint().to_string(),
    };

    GeneratedAgent {
        user_agent,
        client_hints,
        family,
        platform,
        major_version: major,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_agent_format() {
        let agent = build_agent(BrowserFamily::Chrome, Platform::Windows, (124, 6367, 207));
        assert_eq!(
            agent.user_agent,
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/124.0.6367.207 Safari/537.36"
        );
        assert_eq!(
            agent.client_hints.sec_ch_ua(),
            "\"Chromium\";v=\"124\", \"Google Chrome\";v=\"124\", \"Not-A.Brand\";v=\"99\""
        );
        assert_eq!(agent.client_hints.sec_ch_ua_platform(), "\"Windows\"");
        assert_eq!(agent.client_hints.sec_ch_ua_mobile(), "?0");
    }

    #[test]
    fn test_edge_agent_mentions_edge_everywhere() {
        let agent = build_agent(BrowserFamily::Edge, Platform::MacOs, (130, 6723, 116));
        assert!(agent.user_agent.ends_with("Edg/130.0.6723.116"));
        assert!(agent.user_agent.contains("Intel Mac OS X"));
        assert!(agent.client_hints.sec_ch_ua().contains("\"Microsoft Edge\";v=\"130\""));
        assert_eq!(agent.client_hints.platform, "macOS");
    }

    #[test]
    fn test_random_source_is_consistent() {
        let source = RandomAgentSource;
        for _ in 0..50 {
            let family = BrowserFamily::random();
            let agent = source.generate(family);
            assert_eq!(agent.family, family);

            let chrome_token = format!("Chrome/{}.", agent.major_version);
            assert!(agent.user_agent.contains(&chrome_token));
            assert_eq!(
                agent.user_agent.contains(" Edg/"),
                family == BrowserFamily::Edge
            );
            assert!(agent
                .client_hints
                .sec_ch_ua()
                .contains(&format!("\"{}\";v=\"{}\"", family.brand(), agent.major_version)));
        }
    }

    #[test]
    fn test_agent_space_is_larger_than_ten() {
        assert!(agent_space_size() > 10);
    }
}
