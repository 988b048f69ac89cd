//! Gemini generative-language provider implementation

use crate::llm::provider::{GenerationRequest, GenerationResponse, LlmError, LlmProvider};
use crate::models::gemini::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Gemini provider for the generative-language HTTP API
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative-language API key
    /// * `base_url` - API base URL, e.g. "https://generativelanguage.googleapis.com/v1beta"
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

    /// Endpoint URL for a model; the key travels as a query parameter
    fn endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    /// Classify Gemini errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api key not valid") || error_lower.contains("api_key_invalid") {
            return "Invalid API key. Please check your Gemini configuration.".to_string();
        }

        if error_lower.contains("quota") || error_lower.contains("resource_exhausted") {
            return "Rate limit or quota exceeded. Please wait and try again.".to_string();
        }

        if error_lower.contains("not found")
            && (error_lower.contains("model") || error_lower.contains("models/"))
        {
            return "Model not found. Please check your model configuration.".to_string();
        }

        if error_lower.contains("safety") || error_lower.contains("blocked") {
            return "The prompt was blocked by the API's safety filters.".to_string();
        }

        error_detail.to_string()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, LlmError> {
        let url = self.endpoint_url(&request.model);

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: Some(request.temperature),
                top_p: None,
                max_output_tokens: Some(request.max_output_tokens),
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
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
                401 | 403 => LlmError::Authentication(classified_error),
                429 => LlmError::RateLimit(classified_error),
                400 | 404 => LlmError::BadRequest(classified_error),
                _ => LlmError::ApiError {
                    status: status.as_u16(),
                    message: classified_error,
                },
            });
        }

        let reply: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unexpected(format!("Failed to parse response: {}", e)))?;

        let text = reply
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        let (prompt_tokens, completion_tokens) = reply
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or((0, 0));

        Ok(GenerationResponse {
            text,
            model: request.model.clone(),
            prompt_tokens,
            completion_tokens,
        })
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let provider = GeminiProvider::new(
            "test-key".to_string(),
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
            30,
        );
        assert_eq!(
            provider.endpoint_url("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_classify_key_error() {
        let result = GeminiProvider::classify_error("API key not valid. Please pass a valid key.");
        assert!(result.contains("API key"));
    }

    #[test]
    fn test_classify_quota_error() {
        let result = GeminiProvider::classify_error("RESOURCE_EXHAUSTED: quota exceeded");
        assert!(result.contains("quota"));
    }
}
