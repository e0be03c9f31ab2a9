//! Embedding providers for history matching.
//!
//! Embeddings convert quote descriptions into vectors so that textually
//! similar projects end up close to each other. The remote provider is
//! optional; [`EmbeddingStrategy`] always has the local term vectors to fall
//! back on.

mod local;
mod strategy;

pub use local::LocalTermEmbeddings;
pub use strategy::{Embedded, EmbeddingSource, EmbeddingStrategy};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Error type for embedding operations.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        retry_after: Option<std::time::Duration>,
    },

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Text too long: {length} > {max}")]
    TextTooLong { length: usize, max: usize },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(e: reqwest::Error) -> Self {
        EmbeddingError::HttpError(e.to_string())
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Maximum input length in characters.
    fn max_input_length(&self) -> usize;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Embedding provider for OpenAI-compatible `/embeddings` endpoints.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddings {
    /// Create a provider for text-embedding-3-small (1536 dimensions) on the
    /// public OpenAI endpoint.
    pub fn new(api_key: SecretString) -> Self {
        Self::with_model(api_key, crate::config::DEFAULT_EMBEDDING_MODEL, 1536)
    }

    /// Use a custom model with specified dimension.
    pub fn with_model(api_key: SecretString, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: crate::config::DEFAULT_EMBEDDING_BASE_URL.to_string(),
            model: model.into(),
            dimension,
        }
    }

    /// Point at another OpenAI-compatible server, e.g. `http://localhost:8080/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Known output size for a model name.
    pub fn dimension_for_model(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    /// POST one input to the endpoint and return its vector.
    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = OpenAiEmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(EmbeddingError::AuthFailed);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(std::time::Duration::from_secs);
            return Err(EmbeddingError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpError(format!(
                "Status {}: {}",
                status, error_text
            )));
        }

        let result: OpenAiEmbeddingResponse = response.json().await.map_err(|e| {
            EmbeddingError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding returned".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn max_input_length(&self) -> usize {
        // 8191 tokens, roughly 32k characters
        32_000
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let length = text.chars().count();
        if length > self.max_input_length() {
            return Err(EmbeddingError::TextTooLong {
                length,
                max: self.max_input_length(),
            });
        }

        self.request_embedding(text).await
    }
}

/// A mock embedding provider for testing.
///
/// Generates deterministic embeddings based on text hash.
pub struct MockEmbeddings {
    dimension: usize,
}

impl MockEmbeddings {
    /// Create a new mock embeddings provider with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    fn max_input_length(&self) -> usize {
        10_000
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        text.hash(&mut hasher);
        let hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut seed = hash;
        for _ in 0..self.dimension {
            // LCG
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = (seed as f32 / u64::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut embedding {
                *x /= magnitude;
            }
        }

        Ok(embedding)
    }
}
