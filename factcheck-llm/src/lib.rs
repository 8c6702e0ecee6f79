//! Model gateway integration for factcheck.
//!
//! This crate exposes the [`traits::LlmClient`] interface, a client for
//! OpenAI-compatible chat-completions gateways, the response sanitizer that
//! recovers JSON from model prose, and the busy indicator that replaces a
//! shared "loading" flag.
//!
//! # Examples
//! ```no_run
//! use factcheck_common::{GatewayConfig, Result};
//! use factcheck_llm::{connect, sanitize, traits::LlmClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let cfg = GatewayConfig {
//!     api_key: Some("sk-...".into()),
//!     ..GatewayConfig::default()
//! };
//! let client = connect(&cfg)?;
//! let reply = client
//!     .ask("gpt-4o-mini", "Answer in JSON.", "Is water wet?", 0.0)
//!     .await?;
//! let parsed = sanitize::extract_json(&reply.text);
//! # Ok(())
//! # }
//! ```
pub mod busy;
pub mod openai;
pub mod sanitize;
pub mod traits;

use factcheck_common::GatewayConfig;
use openai::OpenAiClient;
use std::sync::Arc;
use traits::LlmClient;

/// Build a shareable gateway client from configuration.
pub fn connect(
    config: &GatewayConfig,
) -> factcheck_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    let client = OpenAiClient::new(config)?;
    tracing::info!(endpoint = %config.endpoint, timeout_secs = config.timeout_secs, "llm.connect");
    Ok(Arc::new(client))
}
