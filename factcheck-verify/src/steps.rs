use crate::prompts;
use crate::types::{Fact, Source, StepResult, VerificationStage};
use async_trait::async_trait;
use chrono::{Months, NaiveDate, Utc};
use factcheck_common::{FactcheckError, Result, VerificationConfig};
use factcheck_llm::sanitize;
use factcheck_llm::traits::LlmClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const STEP_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Semantic,
    CrossReference,
    Recency,
}

impl StepKind {
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::Semantic => "semantic",
            StepKind::CrossReference => "cross_reference",
            StepKind::Recency => "recency",
        }
    }

    /// State the run enters once this step passes.
    pub fn completed_stage(&self) -> VerificationStage {
        match self {
            StepKind::Semantic => VerificationStage::SemanticChecked,
            StepKind::CrossReference => VerificationStage::CrossReferenced,
            StepKind::Recency => VerificationStage::DatesChecked,
        }
    }
}

/// One single-shot model check over the fact and the surviving sources.
#[async_trait]
pub trait VerificationStep: Send + Sync {
    fn kind(&self) -> StepKind;

    /// A negative verdict is `Ok` with `is_valid == false`; errors are
    /// reserved for gateway failures and unusable replies.
    async fn check(&self, fact: &Fact, sources: &[Source]) -> Result<StepResult>;
}

/// Ask, sanitize and decode. Returns the raw object too, for audit.
async fn ask_step<T: DeserializeOwned>(
    client: &dyn LlmClient,
    model: &str,
    kind: StepKind,
    system: &str,
    prompt: &str,
) -> Result<(T, Value)> {
    let reply = client.ask(model, system, prompt, STEP_TEMPERATURE).await?;
    let unparseable = || FactcheckError::Unparseable { step: kind.name() };
    let Some(value) = sanitize::extract_json(&reply.text) else {
        tracing::warn!(step = kind.name(), raw = %reply.text, "step.unparseable");
        return Err(unparseable());
    };
    let typed = serde_json::from_value(value.clone()).map_err(|e| {
        tracing::warn!(step = kind.name(), error = %e, "step.shape_mismatch");
        unparseable()
    })?;
    Ok((typed, value))
}

fn reason_or(analysis: Option<String>, kind: StepKind) -> String {
    analysis
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| format!("{} check returned no analysis", kind.name()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SemanticReply {
    #[serde(default)]
    is_valid: bool,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrossReferenceReply {
    #[serde(default)]
    is_supported: bool,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecencyReply {
    #[serde(default)]
    are_recent: bool,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    analysis: Option<String>,
}

/// Logical consistency and plausibility of the fact.
pub struct SemanticVerifier {
    client: Arc<dyn LlmClient + Send + Sync>,
    config: Arc<VerificationConfig>,
}

impl SemanticVerifier {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, config: Arc<VerificationConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VerificationStep for SemanticVerifier {
    fn kind(&self) -> StepKind {
        StepKind::Semantic
    }

    async fn check(&self, fact: &Fact, sources: &[Source]) -> Result<StepResult> {
        let (reply, raw): (SemanticReply, _) = ask_step(
            self.client.as_ref(),
            &self.config.model,
            self.kind(),
            prompts::SEMANTIC_SYSTEM,
            &prompts::semantic(fact, sources),
        )
        .await?;
        Ok(StepResult {
            is_valid: reply.is_valid && reply.confidence > self.config.semantic_confidence_min,
            reason: reason_or(reply.analysis, self.kind()),
            details: Some(raw),
            threshold: None,
        })
    }
}

/// Whether the sources would plausibly carry the fact.
pub struct CrossReferenceVerifier {
    client: Arc<dyn LlmClient + Send + Sync>,
    config: Arc<VerificationConfig>,
}

impl CrossReferenceVerifier {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, config: Arc<VerificationConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VerificationStep for CrossReferenceVerifier {
    fn kind(&self) -> StepKind {
        StepKind::CrossReference
    }

    async fn check(&self, fact: &Fact, sources: &[Source]) -> Result<StepResult> {
        let (reply, raw): (CrossReferenceReply, _) = ask_step(
            self.client.as_ref(),
            &self.config.model,
            self.kind(),
            prompts::CROSS_REFERENCE_SYSTEM,
            &prompts::cross_reference(fact, sources),
        )
        .await?;
        Ok(StepResult {
            is_valid: reply.is_supported
                && reply.confidence > self.config.cross_reference_confidence_min,
            reason: reason_or(reply.analysis, self.kind()),
            details: Some(raw),
            threshold: None,
        })
    }
}

/// Whether the sources fall inside the rolling recency window.
pub struct RecencyVerifier {
    client: Arc<dyn LlmClient + Send + Sync>,
    config: Arc<VerificationConfig>,
    today: Option<NaiveDate>,
}

impl RecencyVerifier {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, config: Arc<VerificationConfig>) -> Self {
        Self {
            client,
            config,
            today: None,
        }
    }

    /// Pin "today" instead of reading the clock.
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// First day inside the window.
    pub fn window_start(&self) -> NaiveDate {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        today
            .checked_sub_months(Months::new(self.config.recency_window_months))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[async_trait]
impl VerificationStep for RecencyVerifier {
    fn kind(&self) -> StepKind {
        StepKind::Recency
    }

    async fn check(&self, _fact: &Fact, sources: &[Source]) -> Result<StepResult> {
        let window_start = self.window_start();
        let (reply, raw): (RecencyReply, _) = ask_step(
            self.client.as_ref(),
            &self.config.model,
            self.kind(),
            prompts::RECENCY_SYSTEM,
            &prompts::recency(sources, self.config.recency_window_months, window_start),
        )
        .await?;
        Ok(StepResult {
            is_valid: reply.are_recent && reply.confidence > self.config.recency_confidence_min,
            reason: reason_or(reply.analysis, self.kind()),
            details: Some(raw),
            threshold: Some(window_start),
        })
    }
}

/// The three checks in their fixed order.
pub fn default_steps(
    client: Arc<dyn LlmClient + Send + Sync>,
    config: Arc<VerificationConfig>,
) -> Vec<Box<dyn VerificationStep>> {
    vec![
        Box::new(SemanticVerifier::new(client.clone(), config.clone())),
        Box::new(CrossReferenceVerifier::new(client.clone(), config.clone())),
        Box::new(RecencyVerifier::new(client, config)),
    ]
}
