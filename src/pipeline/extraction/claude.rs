//! Anthropic messages-API client, the fallback extraction provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::SYSTEM_PROMPT;
use super::types::{CompletionClient, COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE};
use super::ExtractionError;

const PROVIDER: &str = "Claude";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl ClaudeClient {
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

    // The scribe role goes in the top-level `system` field rather than a
    // synthetic user turn; the messages API treats a leading system turn
    // inside `messages` as invalid.
    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: COMPLETION_MAX_TOKENS,
            temperature: COMPLETION_TEMPERATURE,
            system: SYSTEM_PROMPT,
            messages: vec![MessageParam {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[async_trait]
impl CompletionClient for ClaudeClient {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractionError> {
        let url = format!("{}/v1/messages", self.base_url);

        debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ExtractionError::from_transport(PROVIDER, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::from_status(PROVIDER, status.as_u16(), &body));
        }

        let parsed: MessagesResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractionError::ResponseParsing {
                    provider: PROVIDER,
                    reason: e.to_string(),
                })?;

        let content = parsed
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ExtractionError::EmptyCompletion { provider: PROVIDER });
        }

        debug!(
            provider = PROVIDER,
            reply_chars = content.chars().count(),
            "Completion received"
        );

        Ok(content)
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<MessageParam<'a>>,
}

#[derive(Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}
