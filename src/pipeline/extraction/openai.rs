//! OpenAI chat-completion client, the primary extraction provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::SYSTEM_PROMPT;
use super::types::{CompletionClient, COMPLETION_MAX_TOKENS, COMPLETION_TEMPERATURE};
use super::ExtractionError;

const PROVIDER: &str = "OpenAI";

pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAiClient {
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

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: COMPLETION_TEMPERATURE,
            max_tokens: COMPLETION_MAX_TOKENS,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ExtractionError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Requesting completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ExtractionError::from_transport(PROVIDER, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::from_status(PROVIDER, status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractionError::ResponseParsing {
                    provider: PROVIDER,
                    reason: e.to_string(),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
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
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = OpenAiClient::new("sk-test", "gpt-4o", "https://api.openai.com/", 60);
        assert_eq!(client.base_url, "https://api.openai.com");
        assert_eq!(client.model, "gpt-4o");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn provider_name_is_stable() {
        let client = OpenAiClient::new("sk-test", "gpt-4o", "https://api.openai.com", 60);
        assert_eq!(client.provider(), "OpenAI");
    }

    #[test]
    fn request_body_carries_system_and_user_roles() {
        let client = OpenAiClient::new("sk-test", "gpt-4o", "https://api.openai.com", 60);
        let body = serde_json::to_value(client.request_body("PROMPT TEXT")).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "PROMPT TEXT");
    }

    #[test]
    fn response_with_missing_content_deserializes() {
        let raw = r#"{"choices":[{"message":{"content":null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn response_with_no_choices_deserializes() {
        let raw = r#"{"id":"cmpl-1"}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
