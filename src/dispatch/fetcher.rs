//! Page fetching
//!
//! [`Fetcher`] is the boundary to whatever engine actually retrieves pages.
//! [`HttpFetcher`] is a plain HTTP implementation presenting the session's
//! identity, with failures classified as:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | HTTP 2xx | `FetchResult::ok(Page)` |
//! | HTTP 404 | Failed, "not found" |
//! | HTTP 429 | Failed, "rate limited" |
//! | Other non-2xx | Failed with the status |
//! | Timeout / connection error | Failed with the cause |
//! | Unbuildable client or bad URL | `Err(RelayError)` |
//!
//! Both failure shapes are retried by the caller.

use crate::config::FetchConfig;
use crate::exec::FetchResult;
use crate::stealth::SessionConfig;
use crate::{RelayError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// A retrieved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Final URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub content_type: String,
    pub body: String,
}

/// One fetch attempt against a target URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, session: &SessionConfig) -> Result<FetchResult<Page>>;
}

/// Headers reqwest negotiates itself
const MANAGED_HEADERS: &[&str] = &["accept-encoding"];

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
    connect_timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }

    /// Builds a client presenting the session's user agent and headers
    pub fn build_client(&self, session: &SessionConfig) -> Result<Client> {
        let mut headers = HeaderMap::new();
        for (name, value) in &session.profile.headers {
            if MANAGED_HEADERS.contains(&name.as_str()) {
                continue;
            }
            let invalid = || RelayError::InvalidHeader {
                name: name.clone(),
                value: value.clone(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .user_agent(session.profile.user_agent.as_str())
            .default_headers(headers)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(client)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, session: &SessionConfig) -> Result<FetchResult<Page>> {
        let target = Url::parse(url)?;
        let client = self.build_client(session)?;

        let response = match client.get(target).send().await {
            Ok(response) => response,
            Err(e) => return Ok(FetchResult::failed(classify_error(url, &e))),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchResult::failed(format!("{}: not found (404)", url)));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(FetchResult::failed(format!("{}: rate limited (429)", url)));
        }
        if !status.is_success() {
            return Ok(FetchResult::failed(format!("{}: HTTP {}", url, status)));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match response.text().await {
            Ok(body) => {
                tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
                Ok(FetchResult::ok(Page {
                    final_url,
                    status_code: status.as_u16(),
                    content_type,
                    body,
                }))
            }
            Err(e) => Ok(FetchResult::failed(format!(
                "{}: failed to read body: {}",
                url, e
            ))),
        }
    }
}

fn classify_error(url: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("{}: request timeout", url)
    } else if error.is_connect() {
        format!("{}: connection failed", url)
    } else {
        format!("{}: {}", url, error)
    }
}
