//! Deterministic canned output for the no-credentials path.
//!
//! The mock document substitutes for a live provider call entirely; the
//! two paths never merge. It follows the exact marker and numbering
//! format the prompt instructs real providers to use, so the parser and
//! validator treat it like any other reply.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::types::CompletionClient;
use super::ExtractionError;

const MOCK_EXTRACTION_DOCUMENT: &str = r#"=== CLINICAL DATA EXTRACTION ===

1. Chief Complaint/Reason for Visit:
   - Patient reports chest pain for the past two days
   - Pain described as sharp and stabbing

2. History of Present Illness (HPI):
   - Onset: Two days ago
   - Character: Sharp, stabbing pain
   - Location: Center of chest
   - Severity: 7/10
   - Aggravating factors: Deep breathing, movement
   - Associated symptoms: Shortness of breath

3. Current Medications:
   - Lisinopril 10mg daily
   - Metformin 500mg twice daily

4. Allergies:
   - No known drug allergies

5. Past Medical History:
   - Hypertension (5 years)
   - Type 2 Diabetes (3 years)

6. Vital Signs:
   - Blood pressure: 142/88 mmHg
   - Heart rate: 92 bpm
   - Respiratory rate: 18 breaths per minute
   - Oxygen saturation: 97% on room air

7. Assessment/Clinical Impression:
   - Chest pain, likely musculoskeletal versus cardiac etiology
   - Rule out acute coronary syndrome

8. Treatment Plan:
   - ECG and troponin levels ordered
   - Chest X-ray ordered
   - Follow up in 48 hours or sooner if symptoms worsen

=== END OF EXTRACTION ==="#;

/// The canned extraction reply. Same string on every call, zero I/O.
pub fn mock_extraction_response() -> String {
    MOCK_EXTRACTION_DOCUMENT.to_string()
}

/// A completion client with a canned reply and an observable call count,
/// for tests that inject a fake through the provider seam.
pub struct MockCompletionClient {
    reply: String,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::with_reply(mock_extraction_response())
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, _prompt: &str) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn provider(&self) -> &'static str {
        "Mock"
    }
}
