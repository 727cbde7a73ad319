//! Page fetching from URLs, files, and stdin.
//!
//! Analysis only needs HTML text; this module is the collaborator that
//! supplies it. [`Source`] decides where an input string points and
//! [`fetch_source`] reads it from there.

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "fetch")]
use std::time::Duration;

use url::Url;

use crate::{AiscoutError, Result};

/// HTTP client configuration for fetching pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: concat!("aiscout/", env!("CARGO_PKG_VERSION")).to_string() }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

/// Builder for [`FetchConfig`].
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.timeout = seconds;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> FetchConfig {
        self.config
    }
}

/// Where a page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(Url),
    File(PathBuf),
    Stdin,
}

impl Source {
    /// Classifies an input string.
    ///
    /// `-` is stdin, `http(s)://` is a URL, `file://` and anything without a
    /// scheme is a local path. Other schemes are rejected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use aiscout_core::fetch::Source;
    ///
    /// assert_eq!(Source::parse("-").unwrap(), Source::Stdin);
    /// assert!(matches!(Source::parse("https://example.com").unwrap(), Source::Url(_)));
    /// assert!(matches!(Source::parse("page.html").unwrap(), Source::File(_)));
    /// assert!(Source::parse("ftp://example.com").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input == "-" {
            return Ok(Source::Stdin);
        }
        if !input.contains("://") {
            return Ok(Source::File(PathBuf::from(input)));
        }

        let url = Url::parse(input).map_err(|e| AiscoutError::InvalidUrl(format!("{}: {}", input, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(Source::Url(url)),
            "file" => url
                .to_file_path()
                .map(Source::File)
                .map_err(|_| AiscoutError::InvalidUrl(format!("{}: not a local file path", input))),
            other => Err(AiscoutError::InvalidUrl(format!("unsupported scheme '{}' in {}", other, input))),
        }
    }

    /// The URL reported for this source.
    ///
    /// Files become absolute `file://` URLs where possible; stdin has none.
    pub fn page_url(&self) -> String {
        match self {
            Source::Url(url) => url.to_string(),
            Source::File(path) => {
                let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                Url::from_file_path(&absolute).map(|u| u.to_string()).unwrap_or_else(|_| path.display().to_string())
            }
            Source::Stdin => String::new(),
        }
    }
}

/// Fetches HTML content from a URL.
///
/// Sends a GET with the configured timeout and User-Agent, follows
/// redirects, and treats non-success statuses and empty bodies as errors.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| AiscoutError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(AiscoutError::InvalidUrl("URL must use http:// or https://".to_string()));
    }

    let client =
        reqwest::Client::builder().timeout(Duration::from_secs(config.timeout)).build().map_err(AiscoutError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| if e.is_timeout() { AiscoutError::Timeout { timeout: config.timeout } } else { AiscoutError::HttpError(e) })?
        .error_for_status()?;

    let content = response.text().await?;
    tracing::debug!(url, bytes = content.len(), "fetched page");
    non_empty(content, url)
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AiscoutError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    non_empty(content, &path.display().to_string())
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    non_empty(buffer, "stdin")
}

/// Fetches from whatever `input` names. See [`Source::parse`].
#[cfg(feature = "fetch")]
pub async fn fetch_source(input: &str, config: &FetchConfig) -> Result<(Source, String)> {
    let source = Source::parse(input)?;
    let html = match &source {
        Source::Url(url) => fetch_url(url.as_str(), config).await?,
        Source::File(path) => fetch_file(path)?,
        Source::Stdin => fetch_stdin()?,
    };
    Ok((source, html))
}

fn non_empty(content: String, origin: &str) -> Result<String> {
    if content.trim().is_empty() { Err(AiscoutError::EmptyDocument(origin.to_string())) } else { Ok(content) }
}
