use serde::Serialize;

/// Application-level constants
pub const APP_NAME: &str = "Medical AI Scribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default completion model for the OpenAI provider.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default completion model for the Claude provider.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default speech-to-text model.
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Timeout applied to every provider HTTP call. Completion replies with
/// 4000 max tokens routinely take tens of seconds, so this sits at the
/// top of the reasonable band rather than the bottom.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Audio uploads above this size are rejected before any network call.
pub const MAX_AUDIO_BYTES: u64 = 25 * 1024 * 1024;

/// Default log filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "info".to_string()
}

/// Settings for the extraction pipeline's completion providers.
/// Always passed in explicitly; nothing reads the environment at module level.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub claude_api_key: Option<String>,
    pub claude_model: String,
    pub claude_base_url: String,
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            claude_api_key: None,
            claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
            claude_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl ExtractionConfig {
    /// Read provider credentials from the environment:
    /// OPENAI_API_KEY, OPENAI_MODEL, CLAUDE_API_KEY.
    /// Blank values count as unconfigured.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.openai_api_key = env_nonempty("OPENAI_API_KEY");
        if let Some(model) = env_nonempty("OPENAI_MODEL") {
            config.openai_model = model;
        }
        config.claude_api_key = env_nonempty("CLAUDE_API_KEY");
        config
    }

    /// Whether at least one completion provider has a credential.
    pub fn has_provider(&self) -> bool {
        self.openai_api_key.is_some() || self.claude_api_key.is_some()
    }
}

/// Settings for the speech-to-text adapter.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_audio_bytes: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_WHISPER_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
            max_audio_bytes: MAX_AUDIO_BYTES,
        }
    }
}

impl TranscriptionConfig {
    /// Speech-to-text goes through the OpenAI Whisper API, so the
    /// credential is the same OPENAI_API_KEY the extraction side uses.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = env_nonempty("OPENAI_API_KEY");
        config
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Health surface for callers that expose a status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

pub fn service_health() -> ServiceHealth {
    ServiceHealth {
        status: "healthy",
        service: APP_NAME,
        version: APP_VERSION,
    }
}
