//! Ordered provider fallback.
//!
//! The router owns the configured completion clients and tries them in
//! order until one returns a reply. OpenAI is primary when both keys are
//! set; Claude is the fallback.

use tracing::{debug, error, info, warn};

use crate::config::ExtractionConfig;

use super::claude::ClaudeClient;
use super::openai::OpenAiClient;
use super::types::CompletionClient;
use super::ExtractionError;

pub struct CompletionRouter {
    clients: Vec<Box<dyn CompletionClient>>,
}

impl CompletionRouter {
    pub fn new(clients: Vec<Box<dyn CompletionClient>>) -> Self {
        Self { clients }
    }

    /// Build the provider chain from configured API keys, in priority
    /// order. Keys absent from the environment produce no client.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mut clients: Vec<Box<dyn CompletionClient>> = Vec::new();

        if let Some(key) = &config.openai_api_key {
            clients.push(Box::new(OpenAiClient::new(
                key,
                &config.openai_model,
                &config.openai_base_url,
                config.timeout_secs,
            )));
        }

        if let Some(key) = &config.claude_api_key {
            clients.push(Box::new(ClaudeClient::new(
                key,
                &config.claude_model,
                &config.claude_base_url,
                config.timeout_secs,
            )));
        }

        let router = Self { clients };
        debug!(providers = ?router.provider_names(), "Completion providers configured");
        router
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.clients.iter().map(|c| c.provider()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Send the prompt to each configured provider in order and return
    /// the first reply. A provider failure falls through to the next
    /// client; the last failure propagates unchanged. With no clients
    /// configured this is `NoProviderConfigured`.
    pub async fn complete(&self, prompt: &str) -> Result<String, ExtractionError> {
        if self.clients.is_empty() {
            return Err(ExtractionError::NoProviderConfigured);
        }

        let mut last_error = None;
        for (index, client) in self.clients.iter().enumerate() {
            match client.complete(prompt).await {
                Ok(reply) => {
                    if index > 0 {
                        info!(
                            provider = client.provider(),
                            "Fallback provider produced the completion"
                        );
                    }
                    return Ok(reply);
                }
                Err(err) => {
                    if index + 1 < self.clients.len() {
                        warn!(
                            provider = client.provider(),
                            error = %err,
                            "Provider failed, trying next in chain"
                        );
                    } else {
                        error!(
                            provider = client.provider(),
                            error = %err,
                            "All completion providers failed"
                        );
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(ExtractionError::NoProviderConfigured))
    }
}
