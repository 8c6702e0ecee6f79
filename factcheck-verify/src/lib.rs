//! Fact verification over model-assessed sources.
//!
//! A run screens each candidate URL ([`url_check`]), asks the gateway to
//! score its credibility ([`assessor`]), and, with at least
//! [`MIN_VALID_SOURCES`] survivors, runs the semantic, cross-reference and
//! recency checks ([`steps`]) in that order. [`FactVerifier`] drives the run
//! and always returns a [`VerificationOutcome`].
//!
//! ```no_run
//! use factcheck_common::{GatewayConfig, VerificationConfig};
//! use factcheck_verify::{Fact, FactVerifier, Source};
//!
//! # #[tokio::main]
//! # async fn main() -> factcheck_common::Result<()> {
//! let client = factcheck_llm::connect(&GatewayConfig {
//!     api_key: Some("sk-...".into()),
//!     ..GatewayConfig::default()
//! })?;
//! let verifier = FactVerifier::new(client, VerificationConfig::default());
//! let outcome = verifier
//!     .verify_fact(
//!         &Fact::from("Company X raised $50M in Series B"),
//!         &[
//!             Source::new("https://news.example.com/x-series-b"),
//!             Source::new("https://press.example.org/x-funding"),
//!         ],
//!     )
//!     .await;
//! println!("{}", outcome.reason);
//! # Ok(())
//! # }
//! ```
pub mod assessor;
pub mod orchestrator;
pub mod prompts;
pub mod steps;
pub mod types;
pub mod url_check;

#[cfg(test)]
mod testing;

pub use assessor::{Assessment, CredibilityAssessor};
pub use orchestrator::{FactVerifier, MIN_VALID_SOURCES};
pub use steps::{StepKind, VerificationStep};
pub use types::{
    Fact, Source, SourceType, StepResult, VerificationDetails, VerificationOutcome,
    VerificationStage,
};
