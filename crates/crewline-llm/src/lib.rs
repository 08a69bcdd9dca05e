//! OpenAI-compatible chat-completions adapter.
//!
//! Implements [`crewline_core::CompletionProvider`] over any endpoint that
//! speaks the `/chat/completions` wire format. The expected-output contract
//! travels as the system message; the rendered task is the user message.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crewline_core::CompletionProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion endpoint configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token; requests fail with a clear error when absent.
    pub api_key: Option<String>,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL`, and `OPENAI_MODEL`.
    pub fn from_env() -> Self {
        OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible completion endpoint.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crewline/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        OpenAiClient { config, http }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Self {
        Self::new(OpenAiConfig::from_env())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, prompt: &str, expected_output: &str) -> anyhow::Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is not set")?;

        let system = format!("Respond with exactly this kind of output: {expected_output}");
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?
            .error_for_status()
            .context("completion endpoint returned an error status")?;

        let parsed: ChatResponse = response
            .json()
            .await
            .context("completion response was not valid JSON")?;

        // An empty or shapeless answer is the caller's problem to tolerate,
        // not a transport error.
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        debug!(model = %self.config.model, chars = content.len(), "completion received");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let config = OpenAiConfig {
            base_url: "https://proxy.example/v1/".to_string(),
            ..OpenAiConfig::default()
        };
        let client = OpenAiClient::new(config);
        assert_eq!(client.endpoint(), "https://proxy.example/v1/chat/completions");
    }

    #[test]
    fn test_chat_response_tolerates_missing_fields() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{}}]}"#).unwrap();
        assert_eq!(parsed.choices[0].message.content, None);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_clear_error() {
        let client = OpenAiClient::new(OpenAiConfig::default());
        let err = client.complete("prompt", "hint").await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
