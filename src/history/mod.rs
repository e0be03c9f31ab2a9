//! Historical quotes and similarity-based price suggestions.
//!
//! Past quotes are read from a [`HistoryStore`], compared to a new project
//! description by cosine similarity of their embeddings, and summarized into a
//! [`SimilaritySuggestion`].

mod matcher;
mod similarity;
mod store;

pub use matcher::QuoteHistoryMatcher;
pub use similarity::{cosine_similarity, parse_embedding};
pub use store::{HistoryStore, InMemoryHistoryStore, JsonFileHistoryStore};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingSource;

/// A past quote as stored by the surrounding application.
///
/// `embedding` is kept as raw JSON: either a numeric array or pgvector-style
/// text such as `"[0.1,0.2]"`. Anything else is skipped at match time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalQuoteRecord {
    pub id: i64,
    pub client_key: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub total_amount: Decimal,
    #[serde(default)]
    pub embedding: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A matched record and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuote {
    pub id: i64,
    pub title: String,
    pub total_amount: Decimal,
    pub similarity: f32,
}

/// Price suggestion drawn from the most similar past quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilaritySuggestion {
    /// Best matches first.
    pub similar_quotes: Vec<SimilarQuote>,
    pub suggested_average: Option<Decimal>,
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
    pub embedding_source: EmbeddingSource,
    pub candidates_considered: usize,
    pub candidates_skipped: usize,
}

impl SimilaritySuggestion {
    /// Build the summary from ranked matches. No matches means no numbers.
    pub fn from_matches(
        similar_quotes: Vec<SimilarQuote>,
        embedding_source: EmbeddingSource,
        candidates_considered: usize,
        candidates_skipped: usize,
    ) -> Self {
        let totals: Vec<Decimal> = similar_quotes.iter().map(|q| q.total_amount).collect();
        let suggested_average = mean(&totals).map(|avg| avg.round_dp(2));

        Self {
            low: totals.iter().copied().min(),
            high: totals.iter().copied().max(),
            suggested_average,
            similar_quotes,
            embedding_source,
            candidates_considered,
            candidates_skipped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.similar_quotes.is_empty()
    }
}

/// Mean of `values`; divides each term first when the plain sum overflows.
fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());
    let checked_sum = |mut terms: &mut dyn Iterator<Item = Decimal>| {
        Iterator::try_fold(&mut terms, Decimal::ZERO, |acc, v| acc.checked_add(v))
    };
    checked_sum(&mut values.iter().copied())
        .map(|sum| sum / count)
        .or_else(|| checked_sum(&mut values.iter().map(|v| *v / count)))
}
