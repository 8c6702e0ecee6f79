//! Minimal HTTP client with safe logging, optional retries, and bearer auth.
//!
//! - Request options: headers, bearer token, timeout, retries, absolute URLs
//! - Never logs secret values; the `Authorization` header is always redacted
//! - Retries 429/5xx and transport failures with exponential backoff and
//!   `Retry-After` support, when a retry budget is configured
//! - Optional *raw* request/response logging via `FACTCHECK_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), factcheck_http::HttpError> {
//! let client = factcheck_http::HttpClient::new("https://api.example.com")?;
//! let page = client
//!     .get_text("index.html", factcheck_http::RequestOpts::default())
//!     .await?;
//! println!("{} {:?}", page.status, page.content_type);
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), retries and final errors.
//! Raw lines use the `http.raw` target.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use uuid::Uuid;

const RAW_ENV: &str = "FACTCHECK_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{method}")];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let mut s = s.to_string();
                truncate_on_char_boundary(&mut s, RAW_MAX_BODY);
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization") {
                "Bearer <redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use factcheck_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     bearer: Some("sk-demo"),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    /// Sent as `Authorization: Bearer <token>` after sanitisation.
    pub bearer: Option<&'a str>,
    pub headers: Option<HeaderMap>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

/// A text body together with the metadata page fetchers care about.
#[derive(Debug, Clone)]
pub struct TextResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    bytes: Vec<u8>,
    req_id: String,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use factcheck_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 0);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 0,
        })
    }

    /// A client with no base URL. Every request must pass an absolute URL
    /// with `allow_absolute` set; relative paths fail with [`HttpError::Url`].
    pub fn absolute_only() -> Result<Self, HttpError> {
        Self::new("about:blank")
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use factcheck_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com")?.with_retries(3);
    /// assert_eq!(client.max_retries, 3);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }


    /// POST a JSON body and decode a JSON reply. Non-2xx becomes [`HttpError::Api`].
    pub async fn post_json_opts<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes =
            serde_json::to_vec(body).map_err(|e| HttpError::Build(format!("body encode: {e}")))?;
        let url = self.resolve(path, opts.allow_absolute)?;
        let raw = self.execute(Method::POST, url, Some(bytes), &opts).await?;
        let snippet = snip_body(&raw.bytes);

        if !raw.status.is_success() {
            let message = extract_error_message(&raw.bytes);
            let request_id = header_request_id(&raw.headers).to_string();
            tracing::warn!(
                req_id=%raw.req_id,
                status=%raw.status,
                message=%message,
                x_request_id=%request_id,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status: raw.status,
                message,
                request_id,
            });
        }

        serde_json::from_slice::<T>(&raw.bytes).map_err(|e| {
            tracing::warn!(
                req_id=%raw.req_id,
                serde_line=%e.line(),
                serde_col=%e.column(),
                serde_err=%e,
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// GET a resource as text. Any status is returned to the caller, which
    /// decides how to report non-2xx pages.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<TextResponse, HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let raw = self.execute(Method::GET, url, None, &opts).await?;
        let content_type = raw
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(TextResponse {
            status: raw.status,
            content_type,
            body: String::from_utf8_lossy(&raw.bytes).into_owned(),
        })
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        opts: &RequestOpts<'_>,
    ) -> Result<RawResponse, HttpError> {
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let bearer = opts.bearer.map(sanitize_api_key).transpose()?;
        let auth_kind = if bearer.is_some() { "bearer" } else { "none" };
        let mut attempt = 0usize;

        loop {
            let req_id = Uuid::new_v4().simple().to_string();
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if let Some(bytes) = &body {
                rb = rb
                    .header(CONTENT_TYPE, "application/json")
                    .body(bytes.clone());
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            if let Some(tok) = &bearer {
                rb = rb.bearer_auth(tok);
            }

            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                auth_kind,
                has_body=%body.is_some(),
                "http.request.start"
            );
            if raw_enabled() {
                let hdrs = opts.headers.clone().unwrap_or_default();
                let curl = make_curl(&method, &url, &hdrs, body.as_deref());
                tracing::debug!(target: "http.raw", %req_id, %curl, "request");
            }

            let t0 = Instant::now();
            let sent = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes().await.map(|b| (status, headers, b.to_vec()))
                }
                Err(err) => Err(err),
            };

            let (status, headers, bytes) = match sent {
                Ok(parts) => parts,
                Err(err) => {
                    let timed_out = err.is_timeout();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            timed_out,
                            message=%err,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id=%req_id, attempt, timed_out, message=%err, "http.network_error");
                    return Err(if timed_out {
                        HttpError::Timeout(timeout)
                    } else {
                        HttpError::Network(err.to_string())
                    });
                }
            };

            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=t0.elapsed().as_millis() as u64,
                body_len=bytes.len(),
                x_request_id=%header_request_id(&headers),
                "http.response.headers"
            );
            if raw_enabled() {
                let mut text = String::from_utf8_lossy(&bytes).into_owned();
                let truncated = truncate_on_char_boundary(&mut text, RAW_MAX_BODY);
                tracing::debug!(
                    target: "http.raw",
                    %req_id,
                    %status,
                    headers=?redact_headers(&headers),
                    body=%text,
                    truncated
                );
            }
            tracing::trace!(req_id=%req_id, body_snippet=%snip_body(&bytes), "http.response.body_snippet");

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < max_retries {
                attempt += 1;
                let delay = retry_delay(&headers, attempt, timeout);
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            return Ok(RawResponse {
                status,
                headers,
                bytes,
                req_id,
            });
        }
    }
}

fn backoff(attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(16) as u32;
    Duration::from_millis(200u64.saturating_mul(1u64 << shift))
}

fn header_request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .or_else(|| headers.get("x-correlation-id"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Pull a human message out of common error envelopes:
/// `{"error":{"message":..}}`, `{"error":".."}`, `{"message":..}`, `{"detail":..}`.
fn extract_error_message(body: &[u8]) -> String {
    if let Ok(val) = serde_json::from_slice::<serde_json::Value>(body) {
        let candidates = [
            val.pointer("/error/message"),
            val.get("error"),
            val.get("message"),
            val.get("detail"),
        ];
        for found in candidates.into_iter().flatten() {
            if let Some(s) = found.as_str().filter(|s| !s.is_empty()) {
                return s.to_string();
            }
        }
    }
    snip_body(body)
}

/// `Retry-After` when present, else backoff. Never longer than one call's
/// timeout.
fn retry_delay(h: &HeaderMap, attempt: usize, timeout: Duration) -> Duration {
    retry_after_delay_secs(h)
        .map(Duration::from_secs)
        .unwrap_or_else(|| backoff(attempt))
        .min(timeout)
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn truncate_on_char_boundary(s: &mut String, max: usize) -> bool {
    if s.len() <= max {
        return false;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
    s.push('…');
    true
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    truncate_on_char_boundary(&mut snip, SNIPPET_MAX);
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if s.is_empty() {
        return Err(HttpError::Build("API key is empty".into()));
    }
    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}
