use crate::assessor::CredibilityAssessor;
use crate::steps::{self, StepKind, VerificationStep};
use crate::types::{
    Fact, Source, StepResult, VerificationDetails, VerificationOutcome, VerificationStage,
};
use factcheck_common::{FactcheckError, Result, VerificationConfig};
use factcheck_llm::traits::LlmClient;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Below this many credible sources no check is attempted.
pub const MIN_VALID_SOURCES: usize = 2;

pub const REASON_VERIFIED: &str = "Fact verified successfully";
pub const REASON_INSUFFICIENT_SOURCES: &str = "Insufficient valid sources";
pub const REASON_FAILED: &str = "Verification process failed";
pub const REASON_TIMED_OUT: &str = "Verification timeout";
pub const REASON_CANCELLED: &str = "Verification cancelled";

/// What a run has established so far. Survives an interrupted run so the
/// aborted outcome can still report it.
#[derive(Default)]
struct Progress {
    stage: VerificationStage,
    valid_sources: Vec<Source>,
    details: VerificationDetails,
}

impl Progress {
    fn record(&mut self, kind: StepKind, result: StepResult) {
        match kind {
            StepKind::Semantic => self.details.semantic = Some(result),
            StepKind::CrossReference => self.details.cross_reference = Some(result),
            StepKind::Recency => self.details.dates = Some(result),
        }
    }

    fn details(&self) -> Option<VerificationDetails> {
        (!self.details.is_empty()).then(|| self.details.clone())
    }

    fn abort(self, reason: String, error: String) -> VerificationOutcome {
        let details = self.details();
        VerificationOutcome::rejected(reason, self.stage, self.valid_sources, details)
            .with_error(error)
    }
}

enum Interrupt {
    TimedOut,
    Cancelled,
}

/// Runs the credibility pass and then each check in order, stopping at the
/// first negative verdict.
///
/// Shareable across tasks; each call is an independent run.
pub struct FactVerifier {
    assessor: CredibilityAssessor,
    steps: Vec<Box<dyn VerificationStep>>,
    config: Arc<VerificationConfig>,
}

impl FactVerifier {
    pub fn new(client: Arc<dyn LlmClient + Send + Sync>, config: VerificationConfig) -> Self {
        let config = Arc::new(config);
        let assessor = CredibilityAssessor::new(client.clone(), config.clone());
        let steps = steps::default_steps(client, config.clone());
        Self::from_parts(assessor, steps, config)
    }

    /// Assemble a verifier with a custom step list.
    pub fn from_parts(
        assessor: CredibilityAssessor,
        steps: Vec<Box<dyn VerificationStep>>,
        config: Arc<VerificationConfig>,
    ) -> Self {
        Self {
            assessor,
            steps,
            config,
        }
    }

    pub fn assessor(&self) -> &CredibilityAssessor {
        &self.assessor
    }

    /// Never fails: every error becomes an aborted outcome.
    pub async fn verify_fact(&self, fact: &Fact, sources: &[Source]) -> VerificationOutcome {
        self.verify_fact_with_cancel(fact, sources, CancellationToken::new())
            .await
    }

    /// As [`verify_fact`](Self::verify_fact), abandoning the run as soon as
    /// `cancel` fires.
    pub async fn verify_fact_with_cancel(
        &self,
        fact: &Fact,
        sources: &[Source],
        cancel: CancellationToken,
    ) -> VerificationOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("verify.run", %run_id, candidates = sources.len());

        async move {
            tracing::info!(fact_len = fact.as_str().len(), "verify.start");
            let mut progress = Progress::default();
            let deadline = self.config.run_deadline();

            let finished = {
                let run = self.run(fact, sources, &mut progress);
                let bounded = async {
                    match deadline {
                        Some(limit) => tokio::time::timeout(limit, run)
                            .await
                            .map_err(|_| Interrupt::TimedOut),
                        None => Ok(run.await),
                    }
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(Interrupt::Cancelled),
                    res = bounded => res,
                }
            };

            let outcome = match finished {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    tracing::error!(stage = ?progress.stage, error = %e, "verify.failed");
                    let error = e.to_string();
                    progress.abort(format!("{REASON_FAILED}: {error}"), error)
                }
                Err(Interrupt::TimedOut) => {
                    tracing::warn!(stage = ?progress.stage, ?deadline, "verify.timed_out");
                    progress.abort(REASON_TIMED_OUT.to_string(), FactcheckError::Timeout.to_string())
                }
                Err(Interrupt::Cancelled) => {
                    tracing::info!(stage = ?progress.stage, "verify.cancelled");
                    progress.abort(REASON_CANCELLED.to_string(), "cancelled by caller".to_string())
                }
            };
            tracing::info!(
                is_valid = outcome.is_valid,
                stage = ?outcome.stage,
                valid_sources = outcome.valid_sources.len(),
                reason = %outcome.reason,
                "verify.done"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        fact: &Fact,
        sources: &[Source],
        progress: &mut Progress,
    ) -> Result<VerificationOutcome> {
        let batch = self.assessor.assess_batch(sources).await;
        progress.valid_sources = batch.accepted;

        if progress.valid_sources.len() < MIN_VALID_SOURCES {
            // Too few survivors because the gateway failed is a failed run,
            // not a verdict on the sources.
            if let Some((url, e)) = batch.failures.into_iter().next() {
                tracing::warn!(%url, "verify.assessment_failed");
                return Err(e);
            }
            tracing::info!(
                valid = progress.valid_sources.len(),
                "verify.insufficient_sources"
            );
            return Ok(VerificationOutcome::rejected(
                REASON_INSUFFICIENT_SOURCES,
                progress.stage,
                progress.valid_sources.clone(),
                None,
            ));
        }
        progress.stage = VerificationStage::SourcesValidated;

        for step in &self.steps {
            let kind = step.kind();
            let result = step.check(fact, &progress.valid_sources).await?;
            let passed = result.is_valid;
            let reason = result.reason.clone();
            tracing::info!(step = kind.name(), passed, "verify.step");
            progress.record(kind, result);

            if !passed {
                return Ok(VerificationOutcome::rejected(
                    reason,
                    progress.stage,
                    progress.valid_sources.clone(),
                    progress.details(),
                ));
            }
            progress.stage = kind.completed_stage();
        }

        progress.stage = VerificationStage::Done;
        Ok(VerificationOutcome::verified(
            REASON_VERIFIED,
            progress.valid_sources.clone(),
            progress.details.clone(),
        ))
    }
}
