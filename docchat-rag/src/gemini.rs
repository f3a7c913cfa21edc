//! Gemini embedding provider using the Generative Language REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Generative Language API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_MODEL: &str = "gemini-embedding-001";

/// The default dimensionality for `gemini-embedding-001`.
const DEFAULT_DIMENSIONS: usize = 3072;

/// The API accepts at most this many requests per batch call.
const MAX_BATCH: usize = 100;

/// An [`EmbeddingProvider`] backed by the Gemini embeddings API.
///
/// Single-text calls ([`embed`](EmbeddingProvider::embed)) are treated as
/// queries (`RETRIEVAL_QUERY`), batch calls as documents
/// (`RETRIEVAL_DOCUMENT`).
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::from_env()?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API to truncate the output vector.
    output_dimensionality: Option<usize>,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::ConfigError("GEMINI_API_KEY must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: GEMINI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            output_dimensionality: None,
        })
    }

    /// Create a new provider using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RagError::ConfigError("GEMINI_API_KEY not set in environment.".into())
        })?;
        Self::new(api_key)
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Truncate embeddings to `dims` values.
    pub fn with_output_dimensionality(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.output_dimensionality = Some(dims);
        self
    }

    /// Point the provider at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request<'a>(&'a self, text: &'a str, task_type: &'static str) -> EmbedRequest<'a> {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: RequestContent { parts: vec![TextPart { text }] },
            task_type,
            output_dimensionality: self.output_dimensionality,
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<R> {
        let url = format!("{}/models/{}:{method}", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "request failed");
                RagError::EmbeddingError {
                    provider: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "Gemini", %status, "API error");
            return Err(RagError::EmbeddingError {
                provider: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse response");
            RagError::EmbeddingError {
                provider: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: RequestContent<'a>,
    task_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", text_len = text.len(), "embedding query");

        let response: EmbedResponse =
            self.post("embedContent", &self.request(text, "RETRIEVAL_QUERY")).await?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            debug!(
                provider = "Gemini",
                batch_size = batch.len(),
                model = %self.model,
                "embedding batch"
            );

            let body = BatchEmbedRequest {
                requests: batch.iter().map(|t| self.request(t, "RETRIEVAL_DOCUMENT")).collect(),
            };
            let response: BatchEmbedResponse = self.post("batchEmbedContents", &body).await?;

            if response.embeddings.len() != batch.len() {
                return Err(RagError::EmbeddingError {
                    provider: "Gemini".into(),
                    message: format!(
                        "expected {} embeddings, API returned {}",
                        batch.len(),
                        response.embeddings.len()
                    ),
                });
            }
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(GeminiEmbeddingProvider::new(""), Err(RagError::ConfigError(_))));
    }

    #[test]
    fn batch_request_uses_document_task_type() {
        let provider = GeminiEmbeddingProvider::new("key").unwrap().with_output_dimensionality(768);
        let body = BatchEmbedRequest {
            requests: vec![provider.request("chunk text", "RETRIEVAL_DOCUMENT")],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["requests"][0]["model"], "models/gemini-embedding-001");
        assert_eq!(value["requests"][0]["taskType"], "RETRIEVAL_DOCUMENT");
        assert_eq!(value["requests"][0]["outputDimensionality"], 768);
        assert_eq!(value["requests"][0]["content"]["parts"][0]["text"], "chunk text");
        assert_eq!(provider.dimensions(), 768);
    }
}
