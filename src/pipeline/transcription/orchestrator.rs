use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::TranscriptionConfig;
use crate::pipeline::extraction::FailureMetadata;

use super::mock::mock_transcription;
use super::types::{
    SpeechToTextClient, SpeechTranscription, TranscriptionMetadata, TranscriptionOptions,
    TranscriptionOutcome,
};
use super::whisper::WhisperClient;
use super::TranscriptionError;

/// Audio container extensions the speech provider accepts. Checked by
/// extension before any upload is attempted.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm", "flac", "ogg", "oga",
];

/// Runs the transcription flow: file checks, provider upload (or mock),
/// source-file cleanup. Owns the speech seam; tests inject fakes through
/// `with_client`.
///
/// `transcribe` always returns an outcome value; every error is
/// converted to the failure arm at this boundary.
pub struct AudioTranscriber {
    client: Option<Box<dyn SpeechToTextClient>>,
    model: String,
    max_audio_bytes: u64,
}

impl AudioTranscriber {
    pub fn new(config: &TranscriptionConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            Box::new(WhisperClient::new(
                key,
                &config.model,
                &config.base_url,
                config.timeout_secs,
            )) as Box<dyn SpeechToTextClient>
        });

        Self {
            client,
            model: config.model.clone(),
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    /// Build a transcriber around an injected speech client, keeping the
    /// config's limits. Test seam.
    pub fn with_client(config: &TranscriptionConfig, client: Box<dyn SpeechToTextClient>) -> Self {
        Self {
            client: Some(client),
            model: config.model.clone(),
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    pub async fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscriptionOptions,
    ) -> TranscriptionOutcome {
        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            path = %audio_path.display(),
            mock = options.mock_transcription,
            delete_after = options.delete_after_transcription,
            "Transcribing audio file"
        );

        let attempt = self.run(audio_path, options).await;

        // The source file is the caller's request-scoped resource: when
        // deletion is requested it happens after the attempt concludes,
        // success or failure, never before or concurrently. A path that
        // never resolved has nothing to delete.
        let skip_cleanup = matches!(attempt, Err(TranscriptionError::FileNotFound { .. }));
        if options.delete_after_transcription && !skip_cleanup {
            match tokio::fs::remove_file(audio_path).await {
                Ok(()) => debug!(request_id = %request_id, "Audio file removed"),
                Err(err) => warn!(
                    request_id = %request_id,
                    path = %audio_path.display(),
                    error = %err,
                    "Could not remove audio file"
                ),
            }
        }

        match attempt {
            Ok((transcription, file_size_bytes, model)) => {
                info!(
                    request_id = %request_id,
                    transcript_chars = transcription.text.chars().count(),
                    duration = ?transcription.duration,
                    language = ?transcription.language,
                    "Transcription complete"
                );
                TranscriptionOutcome::Success {
                    transcript: transcription.text,
                    duration: transcription.duration,
                    language: transcription.language,
                    metadata: TranscriptionMetadata {
                        processed_at: Utc::now(),
                        model,
                        file_size_bytes,
                    },
                }
            }
            Err(err) => {
                error!(request_id = %request_id, error = %err, "Transcription failed");
                TranscriptionOutcome::Failure {
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
        audio_path: &Path,
        options: &TranscriptionOptions,
    ) -> Result<(SpeechTranscription, u64, String), TranscriptionError> {
        // Step 1: The file must exist
        let file_metadata = match tokio::fs::metadata(audio_path).await {
            Ok(m) => m,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(TranscriptionError::FileNotFound {
                    path: audio_path.display().to_string(),
                });
            }
            Err(err) => return Err(TranscriptionError::Io(err)),
        };

        // Step 2: Enforce the provider's upload size cap
        let file_size_bytes = file_metadata.len();
        if file_size_bytes > self.max_audio_bytes {
            return Err(TranscriptionError::FileTooLarge {
                size: file_size_bytes,
                limit: self.max_audio_bytes,
            });
        }

        // Step 3: Only known audio container extensions are uploadable
        let extension = audio_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            return Err(TranscriptionError::UnsupportedFormat {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            });
        }

        // Step 4: The mock substitutes for the upload, after the same file checks
        if options.mock_transcription {
            return Ok((mock_transcription(), file_size_bytes, "mock".to_string()));
        }

        // Step 5: Upload through the configured speech client
        let client = self
            .client
            .as_ref()
            .ok_or(TranscriptionError::ProviderNotConfigured)?;
        let transcription = client.transcribe(audio_path).await?;

        Ok((transcription, file_size_bytes, self.model.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::mock::MockSpeechClient;
    use super::*;

    fn write_audio(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn mock_options() -> TranscriptionOptions {
        TranscriptionOptions {
            mock_transcription: true,
            ..TranscriptionOptions::default()
        }
    }

    fn no_provider_transcriber() -> AudioTranscriber {
        AudioTranscriber::new(&TranscriptionConfig::default())
    }

    #[tokio::test]
    async fn mock_path_succeeds_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.mp3", b"not really audio");

        let outcome = no_provider_transcriber()
            .transcribe(&path, &mock_options())
            .await;

        assert!(outcome.is_success());
        assert!(outcome
            .transcript()
            .unwrap()
            .starts_with("Doctor: Hello, how are you today?"));
        match outcome {
            TranscriptionOutcome::Success { metadata, .. } => {
                assert_eq!(metadata.model, "mock");
                assert_eq!(metadata.file_size_bytes, b"not really audio".len() as u64);
            }
            TranscriptionOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert!(path.exists(), "file survives without the delete flag");
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_other_check() {
        let outcome = no_provider_transcriber()
            .transcribe(Path::new("/nonexistent/visit.mp3"), &mock_options())
            .await;

        let error = outcome.error().unwrap();
        assert!(error.starts_with("Audio file not found:"));
        assert!(error.contains("/nonexistent/visit.mp3"));
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.mp3", &[0u8; 64]);

        let config = TranscriptionConfig {
            max_audio_bytes: 16,
            ..TranscriptionConfig::default()
        };
        let outcome = AudioTranscriber::new(&config)
            .transcribe(&path, &mock_options())
            .await;

        let error = outcome.error().unwrap();
        assert!(error.contains("64 bytes"));
        assert!(error.contains("16 byte limit"));
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "notes.txt", b"transcript, not audio");

        let outcome = no_provider_transcriber()
            .transcribe(&path, &mock_options())
            .await;

        assert_eq!(outcome.error(), Some("Unsupported audio format: txt"));
    }

    #[tokio::test]
    async fn extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "VISIT.MP3", b"audio");

        let outcome = no_provider_transcriber()
            .transcribe(&path, &mock_options())
            .await;

        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn no_credential_and_no_mock_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.wav", b"audio");

        let outcome = no_provider_transcriber()
            .transcribe(&path, &TranscriptionOptions::default())
            .await;

        assert_eq!(
            outcome.error(),
            Some("No speech-to-text API key configured. Set OPENAI_API_KEY.")
        );
    }

    #[tokio::test]
    async fn delete_flag_removes_file_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.mp3", b"audio");

        let options = TranscriptionOptions {
            delete_after_transcription: true,
            mock_transcription: true,
        };
        let outcome = no_provider_transcriber().transcribe(&path, &options).await;

        assert!(outcome.is_success());
        assert!(!path.exists(), "file should be removed after success");
    }

    #[tokio::test]
    async fn delete_flag_removes_file_on_failure_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.mp3", b"audio");

        // no credential, mock off: the attempt fails after the file checks
        let options = TranscriptionOptions {
            delete_after_transcription: true,
            mock_transcription: false,
        };
        let outcome = no_provider_transcriber().transcribe(&path, &options).await;

        assert!(!outcome.is_success());
        assert!(!path.exists(), "file should be removed after failure");
    }

    #[tokio::test]
    async fn injected_client_supplies_the_transcription() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "visit.m4a", b"audio");

        let client = MockSpeechClient::with_transcription(SpeechTranscription {
            text: "Doctor: follow-up visit.".to_string(),
            duration: Some(30.5),
            language: Some("english".to_string()),
        });
        let transcriber =
            AudioTranscriber::with_client(&TranscriptionConfig::default(), Box::new(client));

        let outcome = transcriber
            .transcribe(&path, &TranscriptionOptions::default())
            .await;

        assert_eq!(outcome.transcript(), Some("Doctor: follow-up visit."));
        match outcome {
            TranscriptionOutcome::Success {
                duration,
                language,
                metadata,
                ..
            } => {
                assert_eq!(duration, Some(30.5));
                assert_eq!(language.as_deref(), Some("english"));
                assert_eq!(metadata.model, "whisper-1");
            }
            TranscriptionOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
    }

    struct UnreachableClient;

    #[async_trait::async_trait]
    impl SpeechToTextClient for UnreachableClient {
        async fn transcribe(
            &self,
            _audio_path: &Path,
        ) -> Result<SpeechTranscription, TranscriptionError> {
            panic!("client must not be reached when file checks fail");
        }

        fn provider(&self) -> &'static str {
            "Unreachable"
        }
    }

    #[tokio::test]
    async fn file_checks_run_before_the_injected_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_audio(&dir, "huge.mp3", &[0u8; 64]);

        let config = TranscriptionConfig {
            max_audio_bytes: 16,
            ..TranscriptionConfig::default()
        };
        let transcriber = AudioTranscriber::with_client(&config, Box::new(UnreachableClient));

        let outcome = transcriber
            .transcribe(&path, &TranscriptionOptions::default())
            .await;

        let error = outcome.error().unwrap();
        assert!(error.contains("byte limit"), "size check should fail first: {error}");
    }
}
