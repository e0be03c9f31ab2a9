//! Vector similarity and stored-embedding decoding.

use std::cmp::Ordering;

use super::SimilarQuote;

/// Cosine similarity of two vectors, computed in `f64`.
///
/// `None` when the lengths differ, either vector is empty or has zero norm,
/// or a component is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if !(dot.is_finite() && norm_a.is_finite() && norm_b.is_finite()) {
        return None;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Some(similarity.clamp(-1.0, 1.0) as f32)
}

/// Decode a stored embedding: a JSON numeric array, or a string holding one
/// (pgvector text format `[0.1,0.2,...]`). Any non-numeric component
/// rejects the whole vector.
pub fn parse_embedding(value: &serde_json::Value) -> Option<Vec<f32>> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| item.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .filter(|v| !v.is_empty()),
        serde_json::Value::String(text) => parse_vector_text(text),
        _ => None,
    }
}

fn parse_vector_text(text: &str) -> Option<Vec<f32>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return None;
    }
    inner
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok().filter(|f| f.is_finite()))
        .collect()
}

/// Order by similarity descending, ties by lower id, and keep `top_k`.
pub(crate) fn rank(mut matches: Vec<SimilarQuote>, top_k: usize) -> Vec<SimilarQuote> {
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    matches.truncate(top_k.max(1));
    matches
}
