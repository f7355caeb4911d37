use crate::stealth::agents::{BrowserFamily, ClientHints, GeneratedAgent, Platform};
use crate::stealth::geo::GeoLocation;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;

/// Common desktop resolutions
pub const VIEWPORTS: &[(u32, u32)] = &[
    (1920, 1080),
    (1366, 768),
    (1536, 864),
    (1440, 900),
    (1280, 720),
    (1600, 900),
    (1920, 1200),
    (2560, 1440),
];

/// Used when viewport randomization is disabled
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1920,
    height: 1080,
};

/// Chromium flags every session is launched with
const BASE_LAUNCH_FLAGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-extensions",
    "--disable-plugins-discovery",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-features=TranslateUI",
    "--disable-ipc-flooding-protection",
];

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn random() -> Self {
        let (width, height) = *VIEWPORTS
            .choose(&mut rand::thread_rng())
            .unwrap_or(&VIEWPORTS[0]);
        Self { width, height }
    }
}

/// Client-presented signals for one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub user_agent: String,
    pub client_hints: ClientHints,
    pub family: BrowserFamily,
    pub platform: Platform,
    pub viewport: Viewport,
    /// Lowercase header names, derived from the user agent and client hints
    pub headers: BTreeMap<String, String>,
}

impl Identity {
    pub(crate) fn new(agent: GeneratedAgent, viewport: Viewport, accept_language: &str) -> Self {
        let headers = derive_headers(&agent.client_hints, accept_language);
        Self {
            user_agent: agent.user_agent,
            client_hints: agent.client_hints,
            family: agent.family,
            platform: agent.platform,
            viewport,
            headers,
        }
    }

    pub fn accept_language(&self) -> Option<&str> {
        self.headers.get("accept-language").map(String::as_str)
    }

    /// Replaces the `accept-language` header
    pub fn with_accept_language(mut self, value: impl Into<String>) -> Self {
        self.headers
            .insert("accept-language".to_string(), value.into());
        self
    }

    /// Launch configuration for a browser presenting this identity
    pub fn browser_profile(&self) -> BrowserProfile {
        let mut extra_launch_flags: Vec<String> =
            BASE_LAUNCH_FLAGS.iter().map(|flag| flag.to_string()).collect();
        extra_launch_flags.push(format!(
            "--window-size={},{}",
            self.viewport.width, self.viewport.height
        ));

        BrowserProfile {
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
            viewport_width: self.viewport.width,
            viewport_height: self.viewport.height,
            extra_launch_flags,
        }
    }
}

fn derive_headers(hints: &ClientHints, accept_language: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    let mut set = |name: &str, value: String| {
        headers.insert(name.to_string(), value);
    };

    set("sec-ch-ua", hints.sec_ch_ua());
    set("sec-ch-ua-mobile", hints.sec_ch_ua_mobile().to_string());
    set("sec-ch-ua-platform", hints.sec_ch_ua_platform());
    set("sec-fetch-dest", "document".to_string());
    set("sec-fetch-mode", "navigate".to_string());
    set("sec-fetch-site", "none".to_string());
    set("sec-fetch-user", "?1".to_string());
    set("upgrade-insecure-requests", "1".to_string());
    set("accept", ACCEPT.to_string());
    set("accept-language", accept_language.to_string());
    set("accept-encoding", "gzip, deflate, br".to_string());
    set("cache-control", "no-cache".to_string());
    set("pragma", "no-cache".to_string());
    set("dnt", "1".to_string());

    headers
}

/// Browser configuration handed to the page-fetching engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub extra_launch_flags: Vec<String>,
}

/// Everything a fetcher needs to present one consistent client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfig {
    pub profile: BrowserProfile,
    pub geolocation: GeoLocation,
}
