use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::ExtractionError;

/// One numbered block from the provider reply: a category heading and
/// its bullet lines, in original order. `details` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub category: String,
    pub details: Vec<String>,
}

/// Summary attached to every extraction result.
/// `total_data_points` counts categories, not bullets; downstream
/// consumers assume the category count, so this definition is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub total_data_points: usize,
    pub categories_found: Vec<String>,
    pub confidence_score: Option<f32>,
}

/// Parsed, categorized output of one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub categories: Vec<ExtractionRecord>,
    pub summary: ExtractionSummary,
}

impl ExtractionResult {
    /// Build a result from parsed records, deriving the summary so that
    /// `summary.total_data_points == categories.len()` holds by construction.
    pub fn from_records(records: Vec<ExtractionRecord>) -> Self {
        let categories_found = records.iter().map(|r| r.category.clone()).collect();
        let summary = ExtractionSummary {
            total_data_points: records.len(),
            categories_found,
            confidence_score: None,
        };
        Self {
            categories: records,
            summary,
        }
    }

    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }
}

/// Structural well-formedness report. Missing expected categories are
/// warnings; only a fully empty extraction is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Per-call options for `process_transcript`.
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Substitute the canned mock document for the provider call.
    pub mock_response: bool,
    /// Label recorded in the outcome metadata; defaults to "default".
    pub method: Option<String>,
}

/// Metadata on the success arm of a processing outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    pub processed_at: DateTime<Utc>,
    pub transcript_length: usize,
    pub extraction_method: String,
}

/// Metadata on the failure arm. Failures record only when they happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureMetadata {
    pub processed_at: DateTime<Utc>,
}

/// The orchestrator's return value. A tagged union: the success and
/// failure payloads have disjoint shapes and callers branch on the tag.
/// Serializes with a literal boolean `success` field rather than serde's
/// enum tagging, so JSON consumers branch on `success` alone.
#[derive(Debug, Clone)]
pub enum ProcessingOutcome {
    Success {
        data: ExtractionResult,
        validation: ValidationReport,
        metadata: ProcessingMetadata,
    },
    Failure {
        error: String,
        metadata: FailureMetadata,
    },
}

impl ProcessingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success { .. })
    }

    /// The extraction payload, when this outcome is a success.
    pub fn data(&self) -> Option<&ExtractionResult> {
        match self {
            ProcessingOutcome::Success { data, .. } => Some(data),
            ProcessingOutcome::Failure { .. } => None,
        }
    }

    /// The error message, when this outcome is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            ProcessingOutcome::Success { .. } => None,
            ProcessingOutcome::Failure { error, .. } => Some(error),
        }
    }
}

impl Serialize for ProcessingOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProcessingOutcome::Success {
                data,
                validation,
                metadata,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("validation", validation)?;
                map.serialize_entry("metadata", metadata)?;
                map.end()
            }
            ProcessingOutcome::Failure { error, metadata } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("metadata", metadata)?;
                map.end()
            }
        }
    }
}

/// Sampling temperature for every completion call. Extraction wants
/// near-deterministic output that stays inside the expected envelope.
pub const COMPLETION_TEMPERATURE: f32 = 0.1;

/// Completion length ceiling requested from providers.
pub const COMPLETION_MAX_TOKENS: u32 = 4000;

/// Completion provider abstraction (allows mocking and fallback chains).
/// One capability: turn a prompt into the model's text reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractionError>;

    /// Short provider name used in logs and error messages.
    fn provider(&self) -> &'static str;
}
