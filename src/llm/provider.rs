//! Provider abstraction layer for LLM text-generation APIs
//!
//! This module defines a common trait for the generation backends (Gemini's
//! generative-language API and OpenAI-compatible chat completions) and the
//! error taxonomy shared by their implementations.

use async_trait::async_trait;
use thiserror::Error;

/// Error types for LLM provider operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Model reply did not contain parseable JSON: {0}")]
    MalformedReply(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// A single prompt to be sent to the generation endpoint
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Resolved model name
    pub model: String,
    /// The assembled natural-language prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
}

/// Generated text plus token accounting
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw text of the model reply
    pub text: String,
    /// Model that produced the reply
    pub model: String,
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens produced by the model
    pub completion_tokens: u32,
}

/// Trait for LLM text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a generation request and await the full reply
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Supported provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "openai" | "open-ai" | "open_ai" => Some(ProviderKind::OpenAi),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!(ProviderKind::from_str("gemini"), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::from_str("Google"), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::from_str("openai"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::from_str("claude"), None);
    }
}
