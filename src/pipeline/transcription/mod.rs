pub mod types;
pub mod whisper;
pub mod mock;
pub mod orchestrator;

pub use types::*;
pub use whisper::*;
pub use mock::*;
pub use orchestrator::*;

use thiserror::Error;

const ERROR_BODY_MAX_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Audio file not found: {path}")]
    FileNotFound { path: String },

    #[error("Audio file is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Unsupported audio format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("No speech-to-text API key configured. Set OPENAI_API_KEY.")]
    ProviderNotConfigured,

    #[error("{provider} API key is invalid or expired")]
    ProviderAuth { provider: &'static str },

    #[error("{provider} rate limit reached, wait and try again")]
    ProviderRateLimited { provider: &'static str },

    #[error("{provider} is unreachable: {reason}")]
    ProviderUnavailable {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} did not respond within {seconds}s")]
    ProviderTimeout { provider: &'static str, seconds: u64 },

    #[error("{provider} returned error (status {status}): {body}")]
    ProviderApi {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} response could not be parsed: {reason}")]
    ResponseParsing {
        provider: &'static str,
        reason: String,
    },

    #[error("Audio file could not be read: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscriptionError {
    pub(crate) fn from_transport(
        provider: &'static str,
        err: reqwest::Error,
        timeout_secs: u64,
    ) -> Self {
        if err.is_timeout() {
            TranscriptionError::ProviderTimeout {
                provider,
                seconds: timeout_secs,
            }
        } else if err.is_connect() {
            TranscriptionError::ProviderUnavailable {
                provider,
                reason: "failed to connect, check your internet connection".into(),
            }
        } else {
            TranscriptionError::ProviderUnavailable {
                provider,
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn from_status(provider: &'static str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => TranscriptionError::ProviderAuth { provider },
            429 => TranscriptionError::ProviderRateLimited { provider },
            500..=599 => TranscriptionError::ProviderUnavailable {
                provider,
                reason: format!("server error (status {status})"),
            },
            _ => {
                let body = if body.chars().count() <= ERROR_BODY_MAX_CHARS {
                    body.to_string()
                } else {
                    body.chars().take(ERROR_BODY_MAX_CHARS).collect::<String>() + "…"
                };
                TranscriptionError::ProviderApi {
                    provider,
                    status,
                    body,
                }
            }
        }
    }
}
