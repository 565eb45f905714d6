use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel used when no line near the top of the resume looks like a name.
pub const NAME_NOT_FOUND: &str = "Name not found";

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Not enough valid data to detect bias.";
pub const NO_BIAS_MESSAGE: &str = "No significant bias detected.";

/// Structured attributes pulled out of one resume.
/// Every field except `name` is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub institute: Option<String>,
    pub education: Option<String>,
}

impl Default for CandidateRecord {
    fn default() -> Self {
        Self {
            name: NAME_NOT_FOUND.to_string(),
            email: None,
            phone: None,
            location: None,
            institute: None,
            education: None,
        }
    }
}

/// Recruiter-supplied cohort criteria. Validated on input, not consumed by scoring.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionCriteria {
    pub target_count: i64,
    pub role: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum CriteriaError {
    #[error("target_count must be a positive integer, got {0}")]
    NonPositiveTargetCount(i64),

    #[error("role cannot be empty")]
    EmptyRole,
}

impl SelectionCriteria {
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.target_count < 1 {
            return Err(CriteriaError::NonPositiveTargetCount(self.target_count));
        }
        if self.role.trim().is_empty() {
            return Err(CriteriaError::EmptyRole);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub filename: String,
    pub info: CandidateRecord,
    pub score: u32,
}

/// A document that could not be turned into a `ScoredResult`.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub filename: String,
    pub error: String,
}

/// One entry of the batch response, in upload order.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scored(ScoredResult),
    Failed(FailedDocument),
}

impl BatchItem {
    pub fn scored(&self) -> Option<&ScoredResult> {
        match self {
            BatchItem::Scored(result) => Some(result),
            BatchItem::Failed(_) => None,
        }
    }
}

/// Cohort-level bias judgment. Serializes to whichever keys are present:
/// `location_biases` and/or `institute_biases`, or a single `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BiasReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_biases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institute_biases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BiasReport {
    pub fn message(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn insufficient_data() -> Self {
        Self::message(INSUFFICIENT_DATA_MESSAGE)
    }

    pub fn no_bias() -> Self {
        Self::message(NO_BIAS_MESSAGE)
    }
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub results: Vec<BatchItem>,
    pub bias_report: BiasReport,
}
