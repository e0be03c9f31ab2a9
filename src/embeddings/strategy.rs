//! Remote-or-local embedding selection.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{EmbeddingProvider, LocalTermEmbeddings, OpenAiEmbeddings};
use crate::config::{EmbeddingConfig, EmbeddingProviderKind};

/// Which backend produced a query vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EmbeddingSource {
    Remote { model: String },
    Local,
}

/// A query vector and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    pub vector: Vec<f32>,
    pub source: EmbeddingSource,
}

/// Calls the remote provider under a timeout and falls back to local term
/// vectors on any failure. Never returns an error.
pub struct EmbeddingStrategy {
    remote: Option<Arc<dyn EmbeddingProvider>>,
    local: LocalTermEmbeddings,
    timeout: Duration,
}

impl EmbeddingStrategy {
    pub fn local_only() -> Self {
        Self {
            remote: None,
            local: LocalTermEmbeddings::new(),
            timeout: crate::config::DEFAULT_EMBEDDING_TIMEOUT,
        }
    }

    pub fn with_remote(provider: Arc<dyn EmbeddingProvider>, timeout: Duration) -> Self {
        Self {
            remote: Some(provider),
            local: LocalTermEmbeddings::new(),
            timeout,
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        match (config.provider, &config.api_key) {
            (EmbeddingProviderKind::OpenAi, Some(api_key)) => {
                let provider = OpenAiEmbeddings::with_model(
                    api_key.clone(),
                    config.model.clone(),
                    OpenAiEmbeddings::dimension_for_model(&config.model),
                )
                .with_base_url(config.base_url.clone());
                Self::with_remote(Arc::new(provider), config.timeout)
            }
            _ => Self::local_only(),
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Embed `text`, preferring the remote provider.
    ///
    /// Text longer than the provider accepts is truncated. A remote vector
    /// whose length differs from the provider's declared dimension is
    /// discarded like any other failure.
    pub async fn embed(&self, text: &str) -> Embedded {
        if let Some(remote) = &self.remote {
            let model = remote.model_name().to_string();
            let input = truncate_chars(text, remote.max_input_length());
            match tokio::time::timeout(self.timeout, remote.embed(input)).await {
                Ok(Ok(vector)) if usable(&vector, remote.dimension()) => {
                    debug!(model = %model, dimension = vector.len(), "Remote embedding ready");
                    return Embedded {
                        vector,
                        source: EmbeddingSource::Remote { model },
                    };
                }
                Ok(Ok(vector)) => {
                    warn!(
                        model = %model,
                        expected = remote.dimension(),
                        actual = vector.len(),
                        "Remote embedding was malformed, using local term vectors"
                    );
                }
                Ok(Err(e)) => {
                    warn!(
                        model = %model,
                        error = %e,
                        "Remote embedding failed, using local term vectors"
                    );
                }
                Err(_) => {
                    warn!(
                        model = %model,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Remote embedding timed out, using local term vectors"
                    );
                }
            }
        }

        Embedded {
            vector: self.local.embed_text(text),
            source: EmbeddingSource::Local,
        }
    }
}

fn usable(vector: &[f32], dimension: usize) -> bool {
    !vector.is_empty() && vector.len() == dimension && vector.iter().all(|x| x.is_finite())
}

/// At most `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

impl Default for EmbeddingStrategy {
    fn default() -> Self {
        Self::local_only()
    }
}
