use async_trait::async_trait;
use eagle_core::error::{EagleError, Result};
use serde::{Deserialize, Serialize};

use crate::ports::ChatModel;

/// Reply budget for one completion
const DEFAULT_MAX_TOKENS: usize = 500;

/// OpenAI-compatible chat completions client
pub struct OpenAiChatModel {
    /// API key sent as a bearer token
    api_key: String,

    /// Base URL (e.g., "https://api.openai.com/v1")
    base_url: String,

    /// Model name to use for completions
    model: String,

    max_tokens: usize,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiChatModel {
    /// Create a new client
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EagleError::ConfigMissing { key: "OPENAI_API_KEY".to_string() });
        }

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            client: reqwest::Client::new(),
        })
    }

    /// Create against the public OpenAI endpoint
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::new(api_key, "https://api.openai.com/v1", model)
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            max_tokens: Some(self.max_tokens),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EagleError::AnalyzerUnavailable {
                reason: format!("Failed to reach chat model at {}: {}", self.base_url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EagleError::AnalyzerUnavailable {
                reason: format!("Chat completion error ({}): {}", status, error_text),
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(|e| EagleError::AnalyzerUnavailable {
                reason: format!("Failed to parse chat completion: {}", e),
            })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.map(|m| m.content).or(choice.text))
            .ok_or_else(|| EagleError::AnalyzerUnavailable {
                reason: "Chat completion contained no choices".to_string(),
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the chat completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat completions API
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Either chat-style `message` or legacy completion-style `text`
#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    text: Option<String>,
}
