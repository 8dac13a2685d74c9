//! Medical AI scribe extraction pipeline.
//!
//! Turns a raw doctor-patient conversation transcript into structured
//! clinical data: the transcript is sanitized, embedded into a fixed
//! extraction prompt, sent to a hosted completion provider (OpenAI
//! primary, Claude fallback) or a deterministic mock, and the
//! marker-delimited reply is parsed into categorized records and
//! validated. A separate transcription adapter turns an audio recording
//! into the transcript consumed by the same pipeline.
//!
//! ```no_run
//! use medscribe::config::ExtractionConfig;
//! use medscribe::pipeline::extraction::{ProcessingOptions, TranscriptProcessor};
//!
//! # async fn demo() {
//! let processor = TranscriptProcessor::new(&ExtractionConfig::from_env());
//! let options = ProcessingOptions {
//!     mock_response: true,
//!     method: None,
//! };
//! let outcome = processor
//!     .process_transcript("Doctor: What brings you in? Patient: Chest pain.", &options)
//!     .await;
//! assert!(outcome.is_success());
//! # }
//! ```

pub mod config;
pub mod pipeline;

pub use config::{service_health, ExtractionConfig, ServiceHealth, TranscriptionConfig};
pub use pipeline::extraction::{
    clinical_categories, validate_extraction, ExtractionError, ExtractionResult,
    ProcessingOptions, ProcessingOutcome, TranscriptProcessor, ValidationReport,
};
pub use pipeline::transcription::{
    AudioTranscriber, TranscriptionError, TranscriptionOptions, TranscriptionOutcome,
};
