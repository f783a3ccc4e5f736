//! LLM port definitions

use async_trait::async_trait;
use eagle_core::error::Result;

/// Port for single-turn text completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one user prompt and return the assistant's reply text
    ///
    /// # Arguments
    /// * `prompt` - The complete user message
    ///
    /// # Returns
    /// The reply content, or `EagleError::AnalyzerUnavailable` when the model
    /// cannot be reached or answers with an error
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the name/identifier of the chat model
    fn model_name(&self) -> &str;
}
