//! HTTP fetcher implementation
//!
//! This module handles the outbound side of a title lookup:
//! - Building the HTTP client with a browser-like user agent
//! - Normalizing the address and issuing a single GET request
//! - Enforcing a per-fetch deadline that aborts the in-flight request
//! - Reading a bounded prefix of the body
//! - Folding every failure into the sentinel title

use crate::config::FetcherSettings;
use crate::fetch::parser::{extract_title, SENTINEL_TITLE};
use crate::url::{normalize_address, NormalizedUrl};
use crate::{ScoutError, UrlError};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Runtime settings for a [`Fetcher`]
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Deadline covering connect, response headers and body
    pub timeout: Duration,

    /// User-Agent header value
    pub user_agent: String,

    /// Body bytes read before giving up on finding a title
    pub max_body_bytes: usize,
}

impl From<&FetcherSettings> for FetcherConfig {
    fn from(settings: &FetcherSettings) -> Self {
        Self {
            timeout: Duration::from_millis(settings.timeout_ms),
            user_agent: settings.user_agent.clone(),
            max_body_bytes: settings.max_body_bytes,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::from(&FetcherSettings::default())
    }
}

/// Title discovered for an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTitle {
    /// Trimmed text of the page's first `<title>` element
    Extracted(String),

    /// No usable response: unreachable, timed out, malformed, or no title
    NoResponse,
}

impl PageTitle {
    /// The title text, or the sentinel for [`PageTitle::NoResponse`]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extracted(title) => title,
            Self::NoResponse => SENTINEL_TITLE,
        }
    }

    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::NoResponse)
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of looking up one address
///
/// Never carries an error; failure is encoded as [`PageTitle::NoResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The address exactly as the caller supplied it
    pub address: String,

    /// The discovered title
    pub title: PageTitle,
}

impl FetchResult {
    pub fn no_response(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            title: PageTitle::NoResponse,
        }
    }
}

/// Why a single fetch produced no usable response
///
/// Only used for logging; callers of [`Fetcher::fetch`] never see it.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] UrlError),

    #[error("connection failed: {0}")]
    Connection(reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("failed to read body: {0}")]
    Body(reqwest::Error),
}

impl FetchFailure {
    /// Short label for log output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedAddress(_) => "malformed-address",
            Self::Connection(_) => "connection",
            Self::Timeout(_) => "timeout",
            Self::Body(_) => "body",
        }
    }
}

/// Builds an HTTP client for title lookups
///
/// Redirects are not followed and idle connections are not pooled, so every
/// fetch opens and owns its own connection.
///
/// # Example
///
/// ```no_run
/// use title_scout::fetch::{build_http_client, FetcherConfig};
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches single addresses and reduces each to a [`FetchResult`]
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Creates a fetcher with its own HTTP client
    pub fn new(config: FetcherConfig) -> Result<Self, ScoutError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Looks up the title for one address
    ///
    /// Always completes within roughly the configured timeout and never
    /// returns an error: malformed addresses, connection failures, timeouts
    /// and bodies without a title all yield [`PageTitle::NoResponse`].
    pub async fn fetch(&self, address: &str) -> FetchResult {
        match self.try_fetch(address).await {
            Ok(body) => {
                let title = match extract_title(&body) {
                    Some(title) => PageTitle::Extracted(title),
                    None => {
                        tracing::debug!("No <title> found for '{}'", address);
                        PageTitle::NoResponse
                    }
                };
                tracing::debug!("Fetched '{}': \"{}\"", address, title);
                FetchResult {
                    address: address.to_string(),
                    title,
                }
            }
            Err(failure) => {
                tracing::debug!(
                    "Fetch of '{}' failed ({}): {}",
                    address,
                    failure.kind(),
                    failure
                );
                FetchResult::no_response(address)
            }
        }
    }

    /// Fetches the body for one address, surfacing the failure kind
    ///
    /// Dropping the download future when the deadline fires aborts the
    /// request and releases its connection.
    pub async fn try_fetch(&self, address: &str) -> Result<String, FetchFailure> {
        let url = normalize_address(address)?;

        tracing::trace!(
            "GET {} via {} to {}:{}{}",
            url,
            url.transport().scheme(),
            url.host(),
            url.port(),
            url.request_target()
        );

        match tokio::time::timeout(self.config.timeout, self.download(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchFailure::Timeout(self.config.timeout)),
        }
    }

    async fn download(&self, url: &NormalizedUrl) -> Result<String, FetchFailure> {
        let mut response = self
            .client
            .get(url.url().clone())
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        tracing::trace!("{} responded with {}", url, response.status());

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout(self.config.timeout)
            } else {
                FetchFailure::Body(e)
            }
        })? {
            let room = self.config.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(
                    "Body of {} reached the {} byte cap, stopped reading",
                    url,
                    self.config.max_body_bytes
                );
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn classify_error(&self, error: reqwest::Error) -> FetchFailure {
        if error.is_timeout() {
            FetchFailure::Timeout(self.config.timeout)
        } else {
            FetchFailure::Connection(error)
        }
    }
}
