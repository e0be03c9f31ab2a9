//! Deterministic bag-of-terms embeddings.
//!
//! Each dimension counts tokens starting with one stem from a fixed
//! vocabulary of quoting terms. Tokens outside the vocabulary are spread over
//! a small set of hashed buckets. The result is L2-normalized, so identical
//! texts always have cosine similarity 1.0.

use async_trait::async_trait;

use super::{EmbeddingError, EmbeddingProvider};
use crate::text::{normalize, tokens};

/// Stems matched by prefix against normalized tokens. Order fixes the
/// dimension layout and must not change once vectors have been stored.
const VOCABULARY: &[&str] = &[
    // building work
    "reform", "obra", "constru", "rehabilit", "demol", "albanil", "tabiq", "fachad",
    "cubiert", "tejad", "cocin", "bano", "suelo", "solad", "alicat", "pintur",
    "carpinter", "ventan", "puert", "aisla", "impermeab", "estructur", "cimenta", "vivienda",
    "piso", "local", "nave", "oficin",
    // installations
    "electri", "fontaner", "climatiz", "calefac", "caldera", "fotovolta", "solar", "ilumin",
    // architecture and design
    "arquitect", "proyect", "licenci", "plano", "interior", "diseno", "logo", "marca",
    // software
    "web", "app", "movil", "softwar", "desarroll", "api", "backend", "frontend",
    "tienda", "ecommerce", "plataform", "integr", "datos", "panel",
    // marketing and consulting
    "marketing", "seo", "redes", "campan", "contenid", "consultor", "estrateg", "auditor",
];

/// Hashed buckets for tokens outside the vocabulary.
const OTHER_BUCKETS: usize = 16;

/// Tokens shorter than this carry no signal.
const MIN_TOKEN_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "con", "para", "por", "una", "los", "las", "del", "que", "the", "and", "sin", "mas", "muy",
    "sobre", "entre", "desde", "hasta",
];

/// Local, dependency-free embedding used when no remote provider is
/// configured or the remote call fails.
#[derive(Debug, Clone, Default)]
pub struct LocalTermEmbeddings;

impl LocalTermEmbeddings {
    pub fn new() -> Self {
        Self
    }

    /// Vector length: vocabulary stems plus the hashed buckets.
    pub const DIMENSION: usize = VOCABULARY.len() + OTHER_BUCKETS;

    /// Embed `text` synchronously. Text with no usable tokens yields the zero
    /// vector, which never matches anything.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let text = normalize(text);
        let mut vector = vec![0.0f32; Self::DIMENSION];

        for token in tokens(&text) {
            if token.chars().count() < MIN_TOKEN_LEN || STOPWORDS.contains(&token) {
                continue;
            }
            let slot = VOCABULARY
                .iter()
                .position(|stem| token.starts_with(stem))
                .unwrap_or_else(|| VOCABULARY.len() + bucket(token));
            vector[slot] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

/// FNV-1a, stable across runs and platforms.
fn bucket(token: &str) -> usize {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in token.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash as usize % OTHER_BUCKETS
}

#[async_trait]
impl EmbeddingProvider for LocalTermEmbeddings {
    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn model_name(&self) -> &str {
        "local-terms"
    }

    fn max_input_length(&self) -> usize {
        usize::MAX
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_vector_is_unit_length() {
        let embedder = LocalTermEmbeddings::new();
        let v = embedder.embed_text("Reforma integral de cocina y baño en Madrid");
        assert_eq!(v.len(), LocalTermEmbeddings::DIMENSION);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_deterministic_and_accent_insensitive() {
        let embedder = LocalTermEmbeddings::new();
        assert_eq!(
            embedder.embed_text("Instalación eléctrica"),
            embedder.embed_text("instalacion electrica")
        );
    }

    #[test]
    fn test_related_texts_score_higher() {
        let embedder = LocalTermEmbeddings::new();
        let query = embedder.embed_text("reforma de cocina");
        let close = embedder.embed_text("reforma completa de cocina y baño");
        let far = embedder.embed_text("campaña de marketing en redes");
        assert!(cosine(&query, &close) > cosine(&query, &far));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = LocalTermEmbeddings::new();
        assert!(embedder.embed_text("").iter().all(|x| *x == 0.0));
        assert!(embedder.embed_text("de la y en").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let mut stems = VOCABULARY.to_vec();
        stems.sort_unstable();
        stems.dedup();
        assert_eq!(stems.len(), VOCABULARY.len());
    }
}
