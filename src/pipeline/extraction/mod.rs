pub mod types;
pub mod categories;
pub mod sanitize;
pub mod prompt;
pub mod openai;
pub mod claude;
pub mod router;
pub mod mock;
pub mod parser;
pub mod validation;
pub mod orchestrator;

pub use types::*;
pub use categories::*;
pub use sanitize::*;
pub use prompt::*;
pub use openai::*;
pub use claude::*;
pub use router::*;
pub use mock::*;
pub use parser::*;
pub use validation::*;
pub use orchestrator::*;

use thiserror::Error;

/// Error bodies are clipped to this many characters before they land in
/// messages shown to users.
const ERROR_BODY_MAX_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid transcript provided")]
    InvalidInput,

    #[error("No API keys configured. Set OPENAI_API_KEY or CLAUDE_API_KEY.")]
    NoProviderConfigured,

    #[error("{provider} API key is invalid or expired")]
    ProviderAuth { provider: &'static str },

    #[error("{provider} rate limit reached, wait and try again")]
    ProviderRateLimited { provider: &'static str },

    #[error("{provider} quota exhausted, check your plan and billing")]
    ProviderQuotaExceeded { provider: &'static str },

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

    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: &'static str },
}

impl ExtractionError {
    /// Map a transport-level reqwest failure (no HTTP status available)
    /// onto the provider taxonomy.
    pub(crate) fn from_transport(
        provider: &'static str,
        err: reqwest::Error,
        timeout_secs: u64,
    ) -> Self {
        if err.is_timeout() {
            ExtractionError::ProviderTimeout {
                provider,
                seconds: timeout_secs,
            }
        } else if err.is_connect() {
            ExtractionError::ProviderUnavailable {
                provider,
                reason: "failed to connect, check your internet connection".into(),
            }
        } else {
            ExtractionError::ProviderUnavailable {
                provider,
                reason: err.to_string(),
            }
        }
    }

    /// Map a non-success HTTP status and response body onto the taxonomy.
    /// 429 means quota exhaustion when the body says so, rate limiting
    /// otherwise; anything unrecognized keeps the original body text.
    pub(crate) fn from_status(provider: &'static str, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ExtractionError::ProviderAuth { provider },
            429 if body.to_lowercase().contains("quota") => {
                ExtractionError::ProviderQuotaExceeded { provider }
            }
            429 => ExtractionError::ProviderRateLimited { provider },
            500..=599 => ExtractionError::ProviderUnavailable {
                provider,
                reason: format!("server error (status {status})"),
            },
            _ => ExtractionError::ProviderApi {
                provider,
                status,
                body: clip_body(body),
            },
        }
    }
}

fn clip_body(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_MAX_CHARS {
        body.to_string()
    } else {
        let clipped: String = body.chars().take(ERROR_BODY_MAX_CHARS).collect();
        format!("{clipped}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_auth() {
        let err = ExtractionError::from_status("OpenAI", 401, "unauthorized");
        assert!(matches!(err, ExtractionError::ProviderAuth { provider: "OpenAI" }));
        assert!(err.to_string().contains("API key is invalid or expired"));
    }

    #[test]
    fn status_403_maps_to_auth() {
        let err = ExtractionError::from_status("Claude", 403, "forbidden");
        assert!(matches!(err, ExtractionError::ProviderAuth { provider: "Claude" }));
    }

    #[test]
    fn status_429_maps_to_rate_limit() {
        let err = ExtractionError::from_status("OpenAI", 429, "slow down");
        assert!(matches!(
            err,
            ExtractionError::ProviderRateLimited { provider: "OpenAI" }
        ));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn status_429_with_quota_body_maps_to_quota() {
        let body = r#"{"error":{"type":"insufficient_quota","message":"You exceeded your current quota"}}"#;
        let err = ExtractionError::from_status("OpenAI", 429, body);
        assert!(matches!(
            err,
            ExtractionError::ProviderQuotaExceeded { provider: "OpenAI" }
        ));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[test]
    fn status_5xx_maps_to_unavailable() {
        for status in [500, 502, 503, 504] {
            let err = ExtractionError::from_status("Claude", status, "oops");
            assert!(
                matches!(err, ExtractionError::ProviderUnavailable { .. }),
                "status {status} should map to unavailable"
            );
        }
    }

    #[test]
    fn unrecognized_status_keeps_original_body() {
        let err = ExtractionError::from_status("OpenAI", 418, "i'm a teapot");
        match err {
            ExtractionError::ProviderApi { status, ref body, .. } => {
                assert_eq!(status, 418);
                assert_eq!(body, "i'm a teapot");
            }
            other => panic!("expected ProviderApi, got {other:?}"),
        }
    }

    #[test]
    fn long_error_bodies_are_clipped() {
        let body = "x".repeat(2_000);
        let err = ExtractionError::from_status("OpenAI", 418, &body);
        match err {
            ExtractionError::ProviderApi { ref body, .. } => {
                assert!(body.chars().count() <= ERROR_BODY_MAX_CHARS + 1);
                assert!(body.ends_with('…'));
            }
            other => panic!("expected ProviderApi, got {other:?}"),
        }
    }

    #[test]
    fn no_provider_message_names_both_env_vars() {
        let msg = ExtractionError::NoProviderConfigured.to_string();
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("CLAUDE_API_KEY"));
    }
}
