//! LLM client module
//!
//! Provides the generative-text capability as an injected trait so the
//! plan generator and the general-question handler can be tested with a
//! deterministic stub.

use std::sync::Arc;

mod client;
mod error;
mod gemini;
mod types;

#[cfg(test)]
pub use client::mock;
pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config.
///
/// Currently only the "gemini" provider is supported.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: gemini",
            other
        ))),
    }
}
