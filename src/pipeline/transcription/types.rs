use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::pipeline::extraction::FailureMetadata;

use super::TranscriptionError;

/// Speech-to-text provider abstraction. One capability: turn an audio
/// file into verbatim text plus whatever duration/language metadata the
/// backend reports.
#[async_trait]
pub trait SpeechToTextClient: Send + Sync {
    async fn transcribe(&self, audio_path: &Path)
        -> Result<SpeechTranscription, TranscriptionError>;

    /// Short provider name used in logs and error messages.
    fn provider(&self) -> &'static str;
}

/// A provider's transcription of one audio file. `duration` is seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpeechTranscription {
    pub text: String,
    pub duration: Option<f64>,
    pub language: Option<String>,
}

/// Per-call options for `transcribe`.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionOptions {
    /// Remove the source file once the transcription attempt concludes,
    /// succeed or fail.
    pub delete_after_transcription: bool,
    /// Substitute the canned consultation transcript for the provider
    /// upload. File checks still apply.
    pub mock_transcription: bool,
}

/// Metadata on the success arm of a transcription outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionMetadata {
    pub processed_at: DateTime<Utc>,
    pub model: String,
    pub file_size_bytes: u64,
}

/// The transcription adapter's return value. Same tagged-union shape as
/// the extraction outcome: a literal boolean `success` field on the
/// wire, disjoint payloads per arm.
#[derive(Debug, Clone)]
pub enum TranscriptionOutcome {
    Success {
        transcript: String,
        duration: Option<f64>,
        language: Option<String>,
        metadata: TranscriptionMetadata,
    },
    Failure {
        error: String,
        metadata: FailureMetadata,
    },
}

impl TranscriptionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscriptionOutcome::Success { .. })
    }

    /// The transcript text, when this outcome is a success.
    pub fn transcript(&self) -> Option<&str> {
        match self {
            TranscriptionOutcome::Success { transcript, .. } => Some(transcript),
            TranscriptionOutcome::Failure { .. } => None,
        }
    }

    /// The error message, when this outcome is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            TranscriptionOutcome::Success { .. } => None,
            TranscriptionOutcome::Failure { error, .. } => Some(error),
        }
    }
}

impl Serialize for TranscriptionOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TranscriptionOutcome::Success {
                transcript,
                duration,
                language,
                metadata,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("transcript", transcript)?;
                map.serialize_entry("duration", duration)?;
                map.serialize_entry("language", language)?;
                map.serialize_entry("metadata", metadata)?;
                map.end()
            }
            TranscriptionOutcome::Failure { error, metadata } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("metadata", metadata)?;
                map.end()
            }
        }
    }
}
