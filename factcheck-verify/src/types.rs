use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A claim to be checked. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fact(String);

impl Fact {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fact {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Fact {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    News,
    PressRelease,
    Research,
    OfficialDocument,
    Blog,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::News => "news",
            SourceType::PressRelease => "press-release",
            SourceType::Research => "research",
            SourceType::OfficialDocument => "official-document",
            SourceType::Blog => "blog",
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    /// Lenient: case, spaces and underscores are normalised so that
    /// `"Press Release"` and `"official_document"` are recognised.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match norm.as_str() {
            "news" => Ok(SourceType::News),
            "press-release" => Ok(SourceType::PressRelease),
            "research" => Ok(SourceType::Research),
            "official-document" => Ok(SourceType::OfficialDocument),
            "blog" => Ok(SourceType::Blog),
            _ => Err(format!("unknown source type: {s}")),
        }
    }
}

/// A candidate supporting URL, enriched with model-derived metadata once it
/// passes credibility assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_type: None,
            credibility_score: None,
            analysis: None,
            date: None,
        }
    }
}

/// Uniform result of one verification step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub is_valid: bool,
    pub reason: String,
    /// The parsed model object, kept for audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Start of the recency window; only the recency step sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_reference: Option<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<StepResult>,
}

impl VerificationDetails {
    pub fn is_empty(&self) -> bool {
        self.semantic.is_none() && self.cross_reference.is_none() && self.dates.is_none()
    }
}

/// States of one run, in order. A run that stops early reports the last
/// state it reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    #[default]
    Start,
    SourcesValidated,
    SemanticChecked,
    CrossReferenced,
    DatesChecked,
    Done,
}

/// Terminal result of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub is_valid: bool,
    pub reason: String,
    pub stage: VerificationStage,
    pub valid_sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_details: Option<VerificationDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationOutcome {
    pub(crate) fn verified(
        reason: &str,
        valid_sources: Vec<Source>,
        details: VerificationDetails,
    ) -> Self {
        Self {
            is_valid: true,
            reason: reason.to_string(),
            stage: VerificationStage::Done,
            valid_sources,
            verification_details: Some(details),
            error: None,
        }
    }

    pub(crate) fn rejected(
        reason: impl Into<String>,
        stage: VerificationStage,
        valid_sources: Vec<Source>,
        details: Option<VerificationDetails>,
    ) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
            stage,
            valid_sources,
            verification_details: details,
            error: None,
        }
    }

    pub(crate) fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_type_parsing_is_lenient() {
        assert_eq!("Press Release".parse(), Ok(SourceType::PressRelease));
        assert_eq!("official_document".parse(), Ok(SourceType::OfficialDocument));
        assert_eq!(" NEWS ".parse(), Ok(SourceType::News));
        assert!("podcast".parse::<SourceType>().is_err());
    }

    #[test]
    fn outcome_serializes_with_camel_case_and_omits_absent_details() {
        let mut source = Source::new("https://example.com/a");
        source.source_type = Some(SourceType::PressRelease);
        source.credibility_score = Some(0.9);
        let outcome = VerificationOutcome::rejected(
            "Insufficient valid sources",
            VerificationStage::Start,
            vec![source],
            None,
        );
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "isValid": false,
                "reason": "Insufficient valid sources",
                "stage": "start",
                "validSources": [{
                    "url": "https://example.com/a",
                    "sourceType": "press-release",
                    "credibilityScore": 0.9
                }]
            })
        );
    }

    #[test]
    fn stages_are_ordered() {
        assert!(VerificationStage::Start < VerificationStage::SourcesValidated);
        assert!(VerificationStage::DatesChecked < VerificationStage::Done);
    }
}
