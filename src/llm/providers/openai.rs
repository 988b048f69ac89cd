//! OpenAI-compatible provider implementation

use crate::llm::provider::{GenerationRequest, GenerationResponse, LlmError, LlmProvider};
use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Provider for OpenAI and OpenAI-compatible chat-completions endpoints
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent as a Bearer token
    /// * `base_url` - API base URL, e.g. "https://api.openai.com/v1"
    /// * `timeout` - Request timeout in seconds
    pub fn new(api_key: String, base_url: String, timeout: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Classify OpenAI errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("invalid_api_key") || error_lower.contains("unauthorized") {
            return "Invalid API key. Please check your OpenAI configuration.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return "Model not found. Please check your model configuration.".to_string();
        }

        if error_lower.contains("billing") || error_lower.contains("payment") {
            return "Billing issue. Please check your OpenAI account billing status.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            max_tokens: Some(request.max_output_tokens),
            temperature: Some(request.temperature),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Unexpected(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let classified_error = Self::classify_error(&error_text);

            return Err(match status.as_u16() {
                401 => LlmError::Authentication(classified_error),
                429 => LlmError::RateLimit(classified_error),
                400 => LlmError::BadRequest(classified_error),
                _ => LlmError::ApiError {
                    status: status.as_u16(),
                    message: classified_error,
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unexpected(format!("Failed to parse response: {}", e)))?;

        let text = completion
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        let (prompt_tokens, completion_tokens) = completion
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(GenerationResponse {
            text,
            model: completion.model,
            prompt_tokens,
            completion_tokens,
        })
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
