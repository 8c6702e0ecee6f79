//! Common types and utilities shared across factcheck crates.
//!
//! This crate defines the shared error type, the configuration sections that
//! several crates consume, and observability helpers. It is intentionally
//! lightweight so that every crate can depend on it without introducing heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`GatewayConfig`]: where and how to reach the model gateway
//! - [`VerificationConfig`]: model id and acceptance thresholds for a run
//! - [`FetchConfig`]: page fetch tuning
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`FactcheckError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use factcheck_common::VerificationConfig;
//!
//! let cfg = VerificationConfig::default();
//! assert_eq!(cfg.credibility_min, 0.7);
//! assert_eq!(cfg.recency_window_months, 3);
//! ```
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod observability;

pub const DEFAULT_GATEWAY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_VERIFICATION_MODEL: &str = "claude-3.5-sonnet";

/// Connection settings for the OpenAI-compatible chat-completions gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token. Optional at load time, required to build a client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Retries on 429/5xx/transport errors. Zero keeps calls single-shot.
    pub max_retries: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GATEWAY_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Policy knobs injected into the verification orchestrator.
///
/// Credibility is accepted inclusively (`score >= credibility_min`); the
/// three single-shot checks require a confidence strictly above their
/// minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub model: String,
    pub credibility_min: f64,
    pub semantic_confidence_min: f64,
    pub cross_reference_confidence_min: f64,
    pub recency_confidence_min: f64,
    pub recency_window_months: u32,
    /// Upper bound on credibility assessments in flight at once.
    pub max_concurrent_assessments: usize,
    /// Deadline for a whole run. `None` means no deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_deadline_secs: Option<u64>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_VERIFICATION_MODEL.to_string(),
            credibility_min: 0.7,
            semantic_confidence_min: 0.8,
            cross_reference_confidence_min: 0.8,
            recency_confidence_min: 0.8,
            recency_window_months: 3,
            max_concurrent_assessments: 4,
            run_deadline_secs: None,
        }
    }
}

impl VerificationConfig {
    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline_secs.map(Duration::from_secs)
    }

    /// Fan-out width, never below one.
    pub fn assessment_concurrency(&self) -> usize {
        self.max_concurrent_assessments.max(1)
    }
}

/// Page fetch tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
        }
    }
}

/// Error types used across the factcheck workspace.
#[derive(thiserror::Error, Debug)]
pub enum FactcheckError {
    /// The model gateway answered with a non-success status.
    #[error("Gateway error: {status} {status_text}: {message}")]
    Gateway {
        status: u16,
        status_text: String,
        message: String,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The model reply contained no parseable JSON object.
    #[error("Unparseable model reply during {step}")]
    Unparseable { step: &'static str },

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`FactcheckError`].
pub type Result<T> = std::result::Result<T, FactcheckError>;
