//! OpenAI Whisper backend.
//!
//! Uploads the audio file as multipart form data and asks for the
//! `verbose_json` response shape, which carries duration and detected
//! language alongside the text.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::types::{SpeechToTextClient, SpeechTranscription};
use super::TranscriptionError;

const PROVIDER: &str = "Whisper";

pub struct WhisperClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        }
    }
}

#[async_trait]
impl SpeechToTextClient for WhisperClient {
    async fn transcribe(
        &self,
        audio_path: &Path,
    ) -> Result<SpeechTranscription, TranscriptionError> {
        let audio_data = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        debug!(
            provider = PROVIDER,
            model = %self.model,
            bytes = audio_data.len(),
            "Uploading audio for transcription"
        );

        let file_part = reqwest::multipart::Part::bytes(audio_data)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| TranscriptionError::ProviderUnavailable {
                provider: PROVIDER,
                reason: format!("could not build upload request: {e}"),
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::from_transport(PROVIDER, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::from_status(
                PROVIDER,
                status.as_u16(),
                &body,
            ));
        }

        let parsed: VerboseTranscription =
            response
                .json()
                .await
                .map_err(|e| TranscriptionError::ResponseParsing {
                    provider: PROVIDER,
                    reason: e.to_string(),
                })?;

        debug!(
            provider = PROVIDER,
            transcript_chars = parsed.text.chars().count(),
            duration = ?parsed.duration,
            language = ?parsed.language,
            "Transcription received"
        );

        Ok(SpeechTranscription {
            text: parsed.text.trim().to_string(),
            duration: parsed.duration,
            language: parsed.language,
        })
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    language: Option<String>,
}
