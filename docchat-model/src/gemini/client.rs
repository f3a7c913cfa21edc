use async_trait::async_trait;
use docchat_core::{CoreError, Llm, LlmRequest, LlmResponse, Result};
use tracing::{debug, error, info};

use super::config::GeminiConfig;
use super::convert::{ErrorResponse, GenerateContentResponse, build_request, parse_response};

/// A [`Llm`] backed by the Gemini `generateContent` endpoint.
pub struct GeminiModel {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CoreError::Config("GEMINI_API_KEY must not be empty".to_string()));
        }
        Ok(Self { client: reqwest::Client::new(), config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, self.config.model)
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        let body = build_request(&request, self.config.temperature);
        debug!(
            model = %self.config.model,
            message_count = request.messages.len(),
            tool_count = request.tools.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.config.model, error = %e, "request failed");
                CoreError::Model(format!("Gemini request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&text).map(|e| e.error.message).unwrap_or(text);
            error!(model = %self.config.model, %status, "API error");
            return Err(CoreError::Model(format!("Gemini API returned {status}: {detail}")));
        }

        let decoded: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(model = %self.config.model, error = %e, "failed to parse response");
            CoreError::Model(format!("failed to parse Gemini response: {e}"))
        })?;

        let response = parse_response(decoded)?;
        info!(
            model = %self.config.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            function_calls = response.message.content.function_calls().len(),
            "generation completed"
        );
        Ok(response)
    }
}
