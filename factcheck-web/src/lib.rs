//! Page acquisition for source review.
//!
//! [`PageFetcher`] downloads an HTML page with browser-like headers and
//! returns its visible text ([`extract::clean_html`]). [`FetchResponse`] is
//! the JSON envelope callers get back, success or not.

pub mod extract;

use factcheck_common::FetchConfig;
use factcheck_http::{HttpClient, HttpError, RequestOpts};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to fetch URL: {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Invalid content type: {0}")]
    ContentType(String),
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Visible text of a fetched HTML page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub url: String,
    pub content: String,
    pub content_type: String,
}

/// Wire envelope: `{success, content, contentType}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<FetchedPage, FetchError>> for FetchResponse {
    fn from(result: Result<FetchedPage, FetchError>) -> Self {
        match result {
            Ok(page) => Self {
                success: true,
                content: Some(page.content),
                content_type: Some(page.content_type),
                error: None,
            },
            Err(e) => Self {
                success: false,
                content: None,
                content_type: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct PageFetcher {
    http: HttpClient,
    headers: HeaderMap,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = HttpClient::absolute_only()?
            .with_timeout(Duration::from_secs(config.timeout_secs.max(1)));

        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));

        Ok(Self { http, headers })
    }

    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedPage, FetchError> {
        let raw_url = raw_url.trim();
        if raw_url.is_empty() {
            return Err(FetchError::MissingUrl);
        }
        let url = url::Url::parse(raw_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme {}",
                url.scheme()
            )));
        }

        let opts = RequestOpts {
            headers: Some(self.headers.clone()),
            allow_absolute: true,
            ..Default::default()
        };
        let resp = self.http.get_text(url.as_str(), opts).await?;

        if !resp.status.is_success() {
            tracing::info!(url = %url, status = resp.status.as_u16(), "fetch.status");
            return Err(FetchError::Status {
                status: resp.status.as_u16(),
                status_text: resp.status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = resp.content_type.unwrap_or_default();
        if !content_type.to_ascii_lowercase().contains("text/html") {
            let shown = if content_type.is_empty() {
                "unknown".to_string()
            } else {
                content_type
            };
            return Err(FetchError::ContentType(shown));
        }

        let content = extract::clean_html(&resp.body);
        tracing::debug!(
            url = %url,
            html_bytes = resp.body.len(),
            text_bytes = content.len(),
            "fetch.ok"
        );
        Ok(FetchedPage {
            url: url.into(),
            content,
            content_type,
        })
    }

    /// [`fetch`](Self::fetch), folded into the wire envelope.
    pub async fn fetch_response(&self, raw_url: &str) -> FetchResponse {
        FetchResponse::from(self.fetch(raw_url).await)
    }
}
