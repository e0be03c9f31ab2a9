//! Similarity search over historical quotes.

use std::sync::Arc;

use tracing::{debug, info};

use super::similarity::{cosine_similarity, parse_embedding, rank};
use super::{HistoryStore, SimilarQuote, SimilaritySuggestion};
use crate::embeddings::EmbeddingStrategy;
use crate::error::HistoryError;
use crate::estimation::MAX_AMOUNT;

/// Finds past quotes similar to a new description and suggests a price.
pub struct QuoteHistoryMatcher {
    store: Arc<dyn HistoryStore>,
    embeddings: EmbeddingStrategy,
}

impl QuoteHistoryMatcher {
    pub fn new(store: Arc<dyn HistoryStore>, embeddings: EmbeddingStrategy) -> Self {
        Self { store, embeddings }
    }

    /// Embed `description`, score the client's past quotes against it and
    /// summarize the `top_k` best (0 is treated as 1).
    ///
    /// Embedding problems never fail the call; store errors do.
    pub async fn suggest_price_from_history(
        &self,
        client_key: &str,
        description: &str,
        sector: Option<&str>,
        top_k: usize,
    ) -> Result<SimilaritySuggestion, HistoryError> {
        let query = self.embeddings.embed(description).await;
        let candidates = self.store.query_by_sector_hint(client_key, sector).await?;

        let considered = candidates.len();
        let mut skipped = 0usize;
        let mut matches = Vec::with_capacity(considered);

        for record in candidates {
            if record.total_amount.abs() > MAX_AMOUNT {
                skipped += 1;
                debug!(id = record.id, "Skipping quote with out-of-range total");
                continue;
            }
            let similarity = parse_embedding(&record.embedding)
                .and_then(|stored| cosine_similarity(&query.vector, &stored));
            match similarity {
                Some(similarity) => matches.push(SimilarQuote {
                    id: record.id,
                    title: record.title,
                    total_amount: record.total_amount,
                    similarity,
                }),
                None => {
                    skipped += 1;
                    debug!(id = record.id, "Skipping quote with unusable embedding");
                }
            }
        }

        let ranked = rank(matches, top_k);
        info!(
            client_key,
            considered,
            skipped,
            matched = ranked.len(),
            "History match complete"
        );

        Ok(SimilaritySuggestion::from_matches(
            ranked,
            query.source,
            considered,
            skipped,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::{EmbeddingSource, LocalTermEmbeddings};
    use crate::history::{HistoricalQuoteRecord, InMemoryHistoryStore};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn record(id: i64, total: Decimal, embedding: serde_json::Value) -> HistoricalQuoteRecord {
        HistoricalQuoteRecord {
            id,
            client_key: "acme".to_string(),
            sector: Some("construccion".to_string()),
            title: format!("Presupuesto {id}"),
            description: String::new(),
            total_amount: total,
            embedding,
            created_at: None,
        }
    }

    fn local_embedding(text: &str) -> serde_json::Value {
        json!(LocalTermEmbeddings::new().embed_text(text))
    }

    fn matcher(records: Vec<HistoricalQuoteRecord>) -> QuoteHistoryMatcher {
        QuoteHistoryMatcher::new(
            Arc::new(InMemoryHistoryStore::new(records)),
            EmbeddingStrategy::local_only(),
        )
    }

    #[tokio::test]
    async fn test_single_identical_record() {
        let description = "Reforma de cocina y baño";
        let matcher = matcher(vec![record(1, dec!(12000), local_embedding(description))]);

        let suggestion = matcher
            .suggest_price_from_history("acme", description, Some("construccion"), 5)
            .await
            .unwrap();

        assert_eq!(suggestion.similar_quotes.len(), 1);
        assert!((suggestion.similar_quotes[0].similarity - 1.0).abs() < 1e-5);
        assert_eq!(suggestion.low, Some(dec!(12000)));
        assert_eq!(suggestion.high, Some(dec!(12000)));
        assert_eq!(suggestion.suggested_average, Some(dec!(12000)));
        assert_eq!(suggestion.embedding_source, EmbeddingSource::Local);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let suggestion = matcher(Vec::new())
            .suggest_price_from_history("acme", "reforma", None, 5)
            .await
            .unwrap();
        assert!(suggestion.is_empty());
        assert_eq!(suggestion.suggested_average, None);
        assert_eq!(suggestion.candidates_considered, 0);
    }

    #[tokio::test]
    async fn test_malformed_embeddings_are_skipped() {
        let description = "pintura de fachada";
        let zero = vec![0.0f32; LocalTermEmbeddings::DIMENSION];
        let matcher = matcher(vec![
            record(1, dec!(8000), local_embedding(description)),
            record(2, dec!(1), json!("not a vector")),
            record(3, dec!(2), json!([0.1, 0.2])),
            record(4, dec!(3), json!(zero)),
            record(5, dec!(4), json!(null)),
        ]);

        let suggestion = matcher
            .suggest_price_from_history("acme", description, None, 10)
            .await
            .unwrap();

        assert_eq!(suggestion.candidates_considered, 5);
        assert_eq!(suggestion.candidates_skipped, 4);
        assert_eq!(suggestion.similar_quotes.len(), 1);
        assert_eq!(suggestion.suggested_average, Some(dec!(8000)));
    }

    #[tokio::test]
    async fn test_top_k_and_ordering() {
        let description = "reforma de cocina";
        let matcher = matcher(vec![
            record(5, dec!(9000), local_embedding("campaña de marketing")),
            record(3, dec!(11000), local_embedding(description)),
            record(1, dec!(13000), local_embedding(description)),
            record(2, dec!(10000), local_embedding("reforma de cocina con pintura")),
        ]);

        let suggestion = matcher
            .suggest_price_from_history("acme", description, None, 2)
            .await
            .unwrap();
        let ids: Vec<i64> = suggestion.similar_quotes.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(suggestion.low, Some(dec!(11000)));
        assert_eq!(suggestion.high, Some(dec!(13000)));
        assert_eq!(suggestion.suggested_average, Some(dec!(12000)));

        let single = matcher
            .suggest_price_from_history("acme", description, None, 0)
            .await
            .unwrap();
        assert_eq!(single.similar_quotes.len(), 1);
        assert_eq!(single.similar_quotes[0].id, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_totals_are_skipped() {
        let description = "reforma de cocina";
        let matcher = matcher(vec![
            record(1, dec!(9000), local_embedding(description)),
            record(2, dec!(50000000000000000000000000000), local_embedding(description)),
            record(3, dec!(50000000000000000000000000000), local_embedding(description)),
        ]);

        let suggestion = matcher
            .suggest_price_from_history("acme", description, None, 5)
            .await
            .unwrap();
        assert_eq!(suggestion.candidates_considered, 3);
        assert_eq!(suggestion.candidates_skipped, 2);
        assert_eq!(suggestion.similar_quotes.len(), 1);
        assert_eq!(suggestion.suggested_average, Some(dec!(9000)));
    }

    struct FailingStore;

    #[async_trait]
    impl HistoryStore for FailingStore {
        async fn query_by_sector_hint(
            &self,
            _client_key: &str,
            _sector: Option<&str>,
        ) -> Result<Vec<HistoricalQuoteRecord>, HistoryError> {
            Err(HistoryError::Store {
                reason: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let matcher =
            QuoteHistoryMatcher::new(Arc::new(FailingStore), EmbeddingStrategy::local_only());
        let err = matcher
            .suggest_price_from_history("acme", "reforma", None, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, HistoryError::Store { .. }));
    }
}
