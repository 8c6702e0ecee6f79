//! Syntactic screening of source URLs before any model call.
//!
//! Hosts must be plain DNS names ending in an alphabetic TLD-like label.
//! IP literals and internationalised domains are rejected on purpose: the
//! credibility prompt works on recognisable publisher domains.

use regex::Regex;
use std::sync::LazyLock;
use url::{Host, Url};

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("label pattern compiles")
});
static TLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,63}$").expect("tld pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("not a parseable absolute URL")]
    Unparseable,
    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("missing host")]
    MissingHost,
    #[error("IP literal hosts are not accepted")]
    IpLiteral,
    #[error("internationalised domains are not accepted")]
    Internationalized,
    #[error("malformed host label `{0}`")]
    MalformedLabel(String),
    #[error("host has no TLD-like suffix")]
    MissingTld,
}

/// Parse and screen a URL, explaining any rejection.
pub fn validate(raw: &str) -> Result<Url, UrlRejection> {
    let url = Url::parse(raw.trim()).map_err(|_| UrlRejection::Unparseable)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlRejection::UnsupportedScheme(other.to_string())),
    }

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return Err(UrlRejection::IpLiteral),
        _ => return Err(UrlRejection::MissingHost),
    };

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Err(UrlRejection::MissingTld);
    }
    for label in &labels {
        if label.to_ascii_lowercase().starts_with("xn--") {
            return Err(UrlRejection::Internationalized);
        }
        if !LABEL.is_match(label) {
            return Err(UrlRejection::MalformedLabel((*label).to_string()));
        }
    }
    match labels.last() {
        Some(tld) if TLD.is_match(tld) => {}
        _ => return Err(UrlRejection::MissingTld),
    }

    Ok(url)
}

/// `true` when [`validate`] accepts the URL. Never errors.
///
/// ```
/// use factcheck_verify::url_check::is_well_formed;
///
/// assert!(is_well_formed("https://example.com"));
/// assert!(!is_well_formed("ftp://example.com"));
/// assert!(!is_well_formed("not a url"));
/// assert!(!is_well_formed("https://a"));
/// ```
pub fn is_well_formed(raw: &str) -> bool {
    validate(raw).is_ok()
}
