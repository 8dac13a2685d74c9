use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ExtractionConfig;

use super::mock::mock_extraction_response;
use super::parser::parse_extraction;
use super::prompt::build_extraction_prompt;
use super::router::CompletionRouter;
use super::sanitize::sanitize_transcript;
use super::types::{
    CompletionClient, ExtractionResult, FailureMetadata, ProcessingMetadata, ProcessingOptions,
    ProcessingOutcome, ValidationReport,
};
use super::validation::validate_extraction;
use super::ExtractionError;

/// Runs the full extraction pipeline: sanitize, prompt, complete, parse,
/// validate. Owns the provider chain; tests inject fakes through
/// `with_client`.
///
/// `process_transcript` always returns an outcome value. Every pipeline
/// error is converted to the failure arm at this boundary; nothing
/// propagates to the caller.
pub struct TranscriptProcessor {
    router: CompletionRouter,
}

impl TranscriptProcessor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            router: CompletionRouter::from_config(config),
        }
    }

    /// Build a processor around a single injected client, bypassing
    /// configuration. Test seam.
    pub fn with_client(client: Box<dyn CompletionClient>) -> Self {
        Self {
            router: CompletionRouter::new(vec![client]),
        }
    }

    pub async fn process_transcript(
        &self,
        transcript: &str,
        options: &ProcessingOptions,
    ) -> ProcessingOutcome {
        let request_id = Uuid::new_v4();
        let method = options
            .method
            .clone()
            .unwrap_or_else(|| "default".to_string());

        info!(
            request_id = %request_id,
            transcript_chars = transcript.chars().count(),
            mock = options.mock_response,
            method = %method,
            "Processing transcript"
        );

        match self.run(transcript, options).await {
            Ok((data, validation, transcript_length)) => {
                info!(
                    request_id = %request_id,
                    categories = data.categories.len(),
                    warnings = validation.warnings.len(),
                    valid = validation.is_valid,
                    "Extraction complete"
                );
                ProcessingOutcome::Success {
                    data,
                    validation,
                    metadata: ProcessingMetadata {
                        processed_at: Utc::now(),
                        transcript_length,
                        extraction_method: method,
                    },
                }
            }
            Err(err) => {
                error!(request_id = %request_id, error = %err, "Extraction failed");
                ProcessingOutcome::Failure {
                    error: err.to_string(),
                    metadata: FailureMetadata {
                        processed_at: Utc::now(),
                    },
                }
            }
        }
    }

    async fn run(
        &self,
        transcript: &str,
        options: &ProcessingOptions,
    ) -> Result<(ExtractionResult, ValidationReport, usize), ExtractionError> {
        // Step 1: Reject unusable input before any provider work
        if transcript.trim().is_empty() {
            return Err(ExtractionError::InvalidInput);
        }

        // Step 2: Sanitize (strip non-printables, collapse whitespace, cap length)
        let sanitized = sanitize_transcript(transcript);

        // Step 3: Embed the transcript in the extraction prompt
        let prompt = build_extraction_prompt(&sanitized);

        // Step 4: Obtain the reply; the mock substitutes for the provider chain entirely
        let reply = if options.mock_response {
            mock_extraction_response()
        } else {
            self.router.complete(&prompt).await?
        };

        // Step 5: Parse the marker-delimited reply into records
        let data = parse_extraction(&reply);

        // Step 6: Validate structure; warnings and errors never block the outcome
        let validation = validate_extraction(&data);

        Ok((data, validation, sanitized.chars().count()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::super::mock::MockCompletionClient;
    use super::super::prompt::{EXTRACTION_START_MARKER, TRANSCRIPT_PLACEHOLDER};
    use super::*;

    fn no_provider_processor() -> TranscriptProcessor {
        TranscriptProcessor::new(&ExtractionConfig::default())
    }

    fn mock_options() -> ProcessingOptions {
        ProcessingOptions {
            mock_response: true,
            method: None,
        }
    }

    struct CapturingClient {
        reply: String,
        last_prompt: Arc<Mutex<Option<String>>>,
    }

    #[async_trait]
    impl CompletionClient for CapturingClient {
        async fn complete(&self, prompt: &str) -> Result<String, ExtractionError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn provider(&self) -> &'static str {
            "Capture"
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> Result<String, ExtractionError> {
            Err(ExtractionError::ProviderAuth { provider: "OpenAI" })
        }

        fn provider(&self) -> &'static str {
            "OpenAI"
        }
    }

    #[tokio::test]
    async fn mock_mode_end_to_end() {
        let processor = no_provider_processor();
        let outcome = processor
            .process_transcript("Patient has a headache.", &mock_options())
            .await;

        assert!(outcome.is_success());
        let data = outcome.data().unwrap();
        assert_eq!(data.categories.len(), 8);
        assert_eq!(data.summary.total_data_points, 8);

        match outcome {
            ProcessingOutcome::Success {
                validation,
                metadata,
                ..
            } => {
                assert!(validation.is_valid);
                assert!(validation.warnings.is_empty());
                assert_eq!(metadata.extraction_method, "default");
                assert_eq!(metadata.transcript_length, "Patient has a headache.".len());
            }
            ProcessingOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[tokio::test]
    async fn empty_transcript_fails_with_invalid_input() {
        let processor = no_provider_processor();
        let outcome = processor.process_transcript("", &mock_options()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some("Invalid transcript provided"));
    }

    #[tokio::test]
    async fn whitespace_only_transcript_fails_with_invalid_input() {
        let processor = no_provider_processor();
        let outcome = processor
            .process_transcript("   \n\t  ", &mock_options())
            .await;

        assert_eq!(outcome.error(), Some("Invalid transcript provided"));
    }

    #[tokio::test]
    async fn no_provider_and_no_mock_fails() {
        let processor = no_provider_processor();
        let outcome = processor
            .process_transcript("Patient has a headache.", &ProcessingOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(
            outcome.error(),
            Some("No API keys configured. Set OPENAI_API_KEY or CLAUDE_API_KEY.")
        );
    }

    #[tokio::test]
    async fn provider_reply_flows_through_parser_and_validator() {
        let reply = format!(
            "{}\n1. Chief Complaint:\n- Persistent cough\n2. History of Present Illness (HPI):\n- Two weeks of symptoms\n{}",
            EXTRACTION_START_MARKER,
            super::super::prompt::EXTRACTION_END_MARKER
        );
        let processor = TranscriptProcessor::with_client(Box::new(
            MockCompletionClient::with_reply(reply),
        ));

        let outcome = processor
            .process_transcript("Patient reports a cough.", &ProcessingOptions::default())
            .await;

        let data = outcome.data().unwrap();
        assert_eq!(data.categories.len(), 2);
        assert_eq!(data.categories[0].category, "Chief Complaint");
        assert_eq!(data.categories[0].details, vec!["Persistent cough"]);
    }

    #[tokio::test]
    async fn prompt_sent_to_provider_embeds_sanitized_transcript() {
        let last_prompt = Arc::new(Mutex::new(None));
        let client = CapturingClient {
            reply: mock_extraction_response(),
            last_prompt: last_prompt.clone(),
        };
        let processor = TranscriptProcessor::with_client(Box::new(client));

        processor
            .process_transcript("Patient   reports\nfever.", &ProcessingOptions::default())
            .await;

        let prompt = last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Patient reports fever."));
        assert!(prompt.contains(EXTRACTION_START_MARKER));
        assert!(!prompt.contains(TRANSCRIPT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn mock_mode_never_calls_the_provider() {
        let last_prompt = Arc::new(Mutex::new(None));
        let client = CapturingClient {
            reply: "should not be used".to_string(),
            last_prompt: last_prompt.clone(),
        };
        let processor = TranscriptProcessor::with_client(Box::new(client));

        let outcome = processor
            .process_transcript("Patient has a headache.", &mock_options())
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.data().unwrap().categories.len(), 8);
        assert!(last_prompt.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn provider_error_becomes_failure_outcome() {
        let processor = TranscriptProcessor::with_client(Box::new(FailingClient));
        let outcome = processor
            .process_transcript("Patient has a headache.", &ProcessingOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some("OpenAI API key is invalid or expired"));
    }

    #[tokio::test]
    async fn unenveloped_reply_succeeds_with_invalid_validation() {
        let processor = TranscriptProcessor::with_client(Box::new(
            MockCompletionClient::with_reply("I could not find any clinical information."),
        ));
        let outcome = processor
            .process_transcript("Hello there.", &ProcessingOptions::default())
            .await;

        assert!(outcome.is_success());
        match outcome {
            ProcessingOutcome::Success {
                data, validation, ..
            } => {
                assert!(data.categories.is_empty());
                assert!(!validation.is_valid);
                assert_eq!(validation.errors, vec!["No clinical data points extracted"]);
            }
            ProcessingOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[tokio::test]
    async fn custom_method_label_is_recorded() {
        let processor = no_provider_processor();
        let options = ProcessingOptions {
            mock_response: true,
            method: Some("demo".to_string()),
        };
        let outcome = processor
            .process_transcript("Patient has a headache.", &options)
            .await;

        match outcome {
            ProcessingOutcome::Success { metadata, .. } => {
                assert_eq!(metadata.extraction_method, "demo");
            }
            ProcessingOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    #[tokio::test]
    async fn oversized_transcript_is_truncated_before_metadata() {
        let processor = no_provider_processor();
        let transcript = "x".repeat(60_000);
        let outcome = processor.process_transcript(&transcript, &mock_options()).await;

        match outcome {
            ProcessingOutcome::Success { metadata, .. } => {
                assert_eq!(metadata.transcript_length, 50_000);
            }
            ProcessingOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }
}
