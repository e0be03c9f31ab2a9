//! Quote preparation: context analysis, cost estimation and history matching
//! in one call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::BenchmarkCatalog;
use crate::config::Config;
use crate::context::{ContextAnalyzer, ProjectContext};
use crate::embeddings::EmbeddingStrategy;
use crate::error::Result;
use crate::estimation::{CostEstimate, CostEstimator};
use crate::history::{HistoryStore, QuoteHistoryMatcher, SimilaritySuggestion};

/// Input for [`QuoteEngine::prepare_quote`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub description: String,
    pub sector: String,
    pub price_range: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Previously derived context to merge with the new description.
    #[serde(default)]
    pub existing_context: Option<ProjectContext>,
    /// Client whose history should be searched. No history lookup without it.
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Everything the downstream quote generator needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePreparation {
    pub context: ProjectContext,
    pub estimate: CostEstimate,
    pub history: Option<SimilaritySuggestion>,
}

pub struct QuoteEngine {
    analyzer: ContextAnalyzer,
    estimator: CostEstimator,
    matcher: Option<QuoteHistoryMatcher>,
    default_top_k: usize,
}

impl QuoteEngine {
    pub fn new(catalog: Arc<BenchmarkCatalog>, config: &Config) -> Self {
        Self {
            analyzer: ContextAnalyzer::new(),
            estimator: CostEstimator::with_catalog(catalog, config.estimator.clone()),
            matcher: None,
            default_top_k: config.history.top_k,
        }
    }

    /// Enable history matching against `store`.
    pub fn with_history(
        mut self,
        store: Arc<dyn HistoryStore>,
        embeddings: EmbeddingStrategy,
    ) -> Self {
        self.matcher = Some(QuoteHistoryMatcher::new(store, embeddings));
        self
    }

    pub fn analyzer(&self) -> &ContextAnalyzer {
        &self.analyzer
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    /// Analyze, estimate and, when a client key and store are available,
    /// look up similar past quotes.
    pub async fn prepare_quote(&self, request: &QuoteRequest) -> Result<QuotePreparation> {
        let context = self.analyzer.analyze(
            &request.description,
            request.existing_context.as_ref(),
            request.location.as_deref(),
            Some(request.sector.as_str()),
        );

        let estimate = self
            .estimator
            .estimate(&request.sector, &request.price_range, &context)?;

        let history = match (&self.matcher, request.client_key.as_deref()) {
            (Some(matcher), Some(client_key)) => Some(
                matcher
                    .suggest_price_from_history(
                        client_key,
                        &request.description,
                        Some(request.sector.as_str()),
                        request.top_k.unwrap_or(self.default_top_k),
                    )
                    .await?,
            ),
            _ => None,
        };

        info!(
            profile = %estimate.profile.label(),
            target_total = %estimate.target_total,
            history_matches = history.as_ref().map_or(0, |h| h.similar_quotes.len()),
            "Quote prepared"
        );

        Ok(QuotePreparation {
            context,
            estimate,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScaleTier;
    use crate::embeddings::LocalTermEmbeddings;
    use crate::error::{Error, EstimateError};
    use crate::history::{HistoricalQuoteRecord, InMemoryHistoryStore};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn request(description: &str, range: &str) -> QuoteRequest {
        QuoteRequest {
            description: description.to_string(),
            sector: "software".to_string(),
            price_range: range.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_prepare_without_history() {
        let engine = QuoteEngine::new(BenchmarkCatalog::seeded(), &Config::default());
        let prepared = engine
            .prepare_quote(&request("Web corporativa para un despacho", "10 - 15"))
            .await
            .unwrap();

        assert!(prepared.context.is_neutral());
        assert_eq!(prepared.estimate.target_total, dec!(12500));
        assert!(prepared.history.is_none());
    }

    #[tokio::test]
    async fn test_urgency_flows_into_estimate() {
        let engine = QuoteEngine::new(BenchmarkCatalog::seeded(), &Config::default());
        let prepared = engine
            .prepare_quote(&request("Web corporativa, entrega en 2 semanas", "10 - 15"))
            .await
            .unwrap();

        assert_eq!(prepared.context.timeline_weeks(), Some(2));
        assert!(prepared.estimate.target_total > dec!(15000));
    }

    #[tokio::test]
    async fn test_existing_context_is_merged() {
        let engine = QuoteEngine::new(BenchmarkCatalog::seeded(), &Config::default());
        let mut req = request("Añadimos un blog", "10 - 15");
        req.existing_context =
            Some(ProjectContext::neutral().with_scale_override(ScaleTier::Enterprise));

        let prepared = engine.prepare_quote(&req).await.unwrap();
        assert_eq!(prepared.context.scale_override(), Some(ScaleTier::Enterprise));
        assert_eq!(prepared.estimate.profile.tier, ScaleTier::Enterprise);
    }

    #[tokio::test]
    async fn test_prepare_with_history() {
        let description = "App móvil con backend y panel de administración";
        let store = InMemoryHistoryStore::new(vec![HistoricalQuoteRecord {
            id: 42,
            client_key: "estudio-norte".to_string(),
            sector: Some("software".to_string()),
            title: "App de reservas".to_string(),
            description: description.to_string(),
            total_amount: dec!(48000),
            embedding: serde_json::json!(LocalTermEmbeddings::new().embed_text(description)),
            created_at: None,
        }]);
        let engine = QuoteEngine::new(BenchmarkCatalog::seeded(), &Config::default())
            .with_history(Arc::new(store), EmbeddingStrategy::local_only());

        let mut req = request(description, "40.000 - 60.000 €");
        req.client_key = Some("estudio-norte".to_string());

        let prepared = engine.prepare_quote(&req).await.unwrap();
        let history = prepared.history.unwrap();
        assert_eq!(history.similar_quotes[0].id, 42);
        assert_eq!(history.suggested_average, Some(dec!(48000)));
    }

    #[tokio::test]
    async fn test_invalid_range_is_reported() {
        let engine = QuoteEngine::new(BenchmarkCatalog::seeded(), &Config::default());
        let err = engine
            .prepare_quote(&request("web", "lo que sea"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Estimate(EstimateError::InvalidRange { .. })));
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "description": "Reforma de local",
            "sector": "construccion",
            "priceRange": "20k-30k",
            "clientKey": "acme",
            "existingContext": {"urgencyMultiplier": 1.12}
        }"#;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.price_range, "20k-30k");
        assert_eq!(req.client_key.as_deref(), Some("acme"));
        assert_eq!(
            req.existing_context.unwrap().urgency_multiplier(),
            1.12
        );
    }
}
