//! Canned consultation transcript for the no-credentials path.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::types::{SpeechToTextClient, SpeechTranscription};
use super::TranscriptionError;

const MOCK_TRANSCRIPT: &str = "Doctor: Hello, how are you today? \
Patient: I've had chest pain for two days. \
Doctor: Can you describe the pain for me? \
Patient: It's sharp and stabbing, right in the center of my chest. It gets worse when I take a deep breath or move around. \
Doctor: On a scale of one to ten, how severe is it? \
Patient: About a seven. \
Doctor: Any other symptoms along with it? \
Patient: Some shortness of breath when the pain flares up. \
Doctor: Are you taking any medications at the moment? \
Patient: Lisinopril ten milligrams daily and metformin five hundred milligrams twice a day. \
Doctor: Any allergies to medications? \
Patient: No, none that I know of. \
Doctor: And your medical history? \
Patient: High blood pressure for about five years and type two diabetes for three. \
Doctor: Your blood pressure today is one forty-two over eighty-eight and your heart rate is ninety-two. I'd like to order an ECG, troponin levels, and a chest X-ray to rule out anything cardiac. It may well be musculoskeletal, but we should be certain. \
Patient: Okay, that makes sense. \
Doctor: If the pain worsens or you feel faint, go to the emergency department right away. Otherwise we'll follow up in two days.";

/// The canned multi-turn consultation. Same transcription on every call.
pub fn mock_transcription() -> SpeechTranscription {
    SpeechTranscription {
        text: MOCK_TRANSCRIPT.to_string(),
        duration: Some(142.0),
        language: Some("english".to_string()),
    }
}

/// A speech client with a canned transcription and an observable call
/// count, for tests that inject a fake through the speech seam.
pub struct MockSpeechClient {
    transcription: SpeechTranscription,
    calls: AtomicUsize,
}

impl MockSpeechClient {
    pub fn new() -> Self {
        Self::with_transcription(mock_transcription())
    }

    pub fn with_transcription(transcription: SpeechTranscription) -> Self {
        Self {
            transcription,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSpeechClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechToTextClient for MockSpeechClient {
    async fn transcribe(
        &self,
        _audio_path: &Path,
    ) -> Result<SpeechTranscription, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transcription.clone())
    }

    fn provider(&self) -> &'static str {
        "Mock"
    }
}
