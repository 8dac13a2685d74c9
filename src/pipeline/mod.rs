pub mod extraction;
pub mod transcription;
