use crate::prompts;
use crate::types::{Source, SourceType};
use crate::url_check::{self, UrlRejection};
use chrono::{DateTime, NaiveDate};
use factcheck_common::{FactcheckError, Result, VerificationConfig};
use factcheck_llm::sanitize;
use factcheck_llm::traits::LlmClient;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;

const CREDIBILITY_TEMPERATURE: f32 = 0.0;

/// Why a single source was or was not kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    /// Passed; carries the enriched copy of the source.
    Accepted(Source),
    /// The model answered but the source fell below policy.
    Rejected { reason: String },
    /// Screened out before any model call.
    InvalidUrl(UrlRejection),
    /// The reply held no usable JSON object.
    Unparseable,
}

/// Result of a batch pass. Gateway failures are kept apart from policy
/// rejections so a caller can tell "not credible" from "could not ask".
#[derive(Debug, Default)]
pub struct AssessmentBatch {
    pub accepted: Vec<Source>,
    pub failures: Vec<(String, FactcheckError)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredibilityReply {
    #[serde(default)]
    is_valid: bool,
    #[serde(default)]
    credibility_score: Option<f64>,
    #[serde(default)]
    source_type: Option<String>,
    #[serde(default)]
    analysis: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Scores candidate URLs through the gateway and keeps the credible ones.
#[derive(Clone)]
pub struct CredibilityAssessor {
    client: Arc<dyn LlmClient + Send + Sync>,
    config: Arc<VerificationConfig>,
}

impl CredibilityAssessor {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, config: Arc<VerificationConfig>) -> Self {
        Self { client, config }
    }

    /// Classify one source. Only gateway failures are errors.
    pub async fn evaluate(&self, source: &Source) -> Result<Assessment> {
        if let Err(rejection) = url_check::validate(&source.url) {
            tracing::debug!(url = %source.url, %rejection, "assess.invalid_url");
            return Ok(Assessment::InvalidUrl(rejection));
        }

        let reply = self
            .client
            .ask(
                &self.config.model,
                prompts::CREDIBILITY_SYSTEM,
                &prompts::credibility(&source.url),
                CREDIBILITY_TEMPERATURE,
            )
            .await?;

        match sanitize::parse_reply::<CredibilityReply>(&reply.text) {
            Some(parsed) => Ok(self.judge(source, parsed)),
            None => {
                tracing::warn!(
                    url = %source.url,
                    reply_len = reply.text.len(),
                    raw = %reply.text,
                    "assess.unparseable"
                );
                Ok(Assessment::Unparseable)
            }
        }
    }

    fn judge(&self, source: &Source, reply: CredibilityReply) -> Assessment {
        let score = match reply.credibility_score {
            Some(score) if reply.is_valid && score >= self.config.credibility_min => score,
            other => {
                let reason = reply.analysis.unwrap_or_else(|| match other {
                    Some(score) => format!("credibility score {score} below threshold"),
                    None => "no credibility score returned".to_string(),
                });
                return Assessment::Rejected { reason };
            }
        };

        let mut enriched = source.clone();
        enriched.credibility_score = Some(score);
        enriched.source_type = reply
            .source_type
            .as_deref()
            .and_then(|t| t.parse::<SourceType>().ok());
        enriched.analysis = reply.analysis;
        enriched.date = reply.date.as_deref().and_then(parse_date);
        Assessment::Accepted(enriched)
    }

    /// Enriched source when accepted. Failures are logged, never raised.
    pub async fn assess(&self, source: &Source) -> Option<Source> {
        match self.evaluate(source).await {
            Ok(assessment) => accepted(&source.url, assessment),
            Err(e) => {
                tracing::warn!(url = %source.url, error = %e, "assess.failed");
                None
            }
        }
    }

    /// Survivors of a bounded fan-out, in input order.
    pub async fn assess_all(&self, sources: &[Source]) -> Vec<Source> {
        self.assess_batch(sources).await.accepted
    }

    /// Like [`assess_all`](Self::assess_all) but also reports which sources
    /// could not be assessed because the gateway failed.
    pub async fn assess_batch(&self, sources: &[Source]) -> AssessmentBatch {
        let limit = self.config.assessment_concurrency();
        let results: Vec<_> = stream::iter(sources)
            .map(|source| async move { (source, self.evaluate(source).await) })
            .buffered(limit)
            .collect()
            .await;

        let mut batch = AssessmentBatch::default();
        for (source, result) in results {
            match result {
                Ok(assessment) => {
                    if let Some(kept) = accepted(&source.url, assessment) {
                        batch.accepted.push(kept);
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %source.url, error = %e, "assess.failed");
                    batch.failures.push((source.url.clone(), e));
                }
            }
        }
        tracing::info!(
            candidates = sources.len(),
            accepted = batch.accepted.len(),
            failed = batch.failures.len(),
            "assess.batch"
        );
        batch
    }
}

fn accepted(url: &str, assessment: Assessment) -> Option<Source> {
    match assessment {
        Assessment::Accepted(source) => Some(source),
        Assessment::Rejected { reason } => {
            tracing::info!(url, %reason, "assess.rejected");
            None
        }
        Assessment::InvalidUrl(_) | Assessment::Unparseable => None,
    }
}

/// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
