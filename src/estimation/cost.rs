//! Cost estimation.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::{BaselineSource, CostEstimate, PriceRange, PricingProfile};
use crate::catalog::{BenchmarkCatalog, BenchmarkReference};
use crate::config::EstimatorConfig;
use crate::context::ProjectContext;
use crate::error::EstimateError;

/// Prices a project from a client range, the benchmark catalog and a context.
pub struct CostEstimator {
    catalog: Arc<BenchmarkCatalog>,
    config: EstimatorConfig,
}

impl CostEstimator {
    /// Create an estimator over the seed catalog with default settings.
    pub fn new() -> Self {
        Self::with_catalog(BenchmarkCatalog::seeded(), EstimatorConfig::default())
    }

    pub fn with_catalog(catalog: Arc<BenchmarkCatalog>, config: EstimatorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &BenchmarkCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate a target total and a low/high band.
    ///
    /// Fails only when `price_range` cannot be read as a positive range.
    pub fn estimate(
        &self,
        sector: &str,
        price_range: &str,
        context: &ProjectContext,
    ) -> Result<CostEstimate, EstimateError> {
        let range = PriceRange::parse(price_range)?;
        let profile = PricingProfile::resolve(sector, context, self.config.default_tier);
        let reference = self
            .catalog
            .reference(profile.sector, profile.tier, profile.project_type);

        let (baseline, baseline_source) = self.baseline(&range, reference.as_ref());

        let urgency_multiplier = context.urgency_multiplier();
        let location_multiplier = context.location_multiplier();

        let too_large = || EstimateError::InvalidRange {
            input: price_range.to_string(),
            reason: "amount too large to price".to_string(),
        };
        let adjusted = baseline
            .checked_mul(to_decimal(urgency_multiplier))
            .and_then(|v| v.checked_mul(to_decimal(location_multiplier)))
            .ok_or_else(too_large)?;
        let low_factor = Decimal::ONE
            .checked_sub(self.config.low_margin)
            .ok_or_else(too_large)?;
        let high_factor = Decimal::ONE
            .checked_add(self.config.high_margin)
            .ok_or_else(too_large)?;

        let floor = self.config.floor;
        let target_total = adjusted.max(floor).round_dp(2);
        let low = adjusted
            .checked_mul(low_factor)
            .ok_or_else(too_large)?
            .max(floor)
            .round_dp(2);
        let high = adjusted
            .checked_mul(high_factor)
            .ok_or_else(too_large)?
            .max(floor)
            .round_dp(2);

        debug!(
            profile = %profile.label(),
            %baseline,
            source = ?baseline_source,
            %target_total,
            "Cost estimated"
        );

        let contributions = match (baseline_source, &reference) {
            (BaselineSource::Catalog, Some(r)) => r.contributors.clone(),
            _ => Vec::new(),
        };

        Ok(CostEstimate {
            target_total,
            low,
            high,
            profile,
            range,
            baseline: baseline.round_dp(2),
            baseline_source,
            catalog_reference: reference.map(|r| r.value),
            contributions,
            urgency_multiplier,
            location_multiplier,
            fluctuation_warning: context.fluctuation_warning().map(str::to_string),
        })
    }

    /// Pick the baseline: the range midpoint unless the catalog value falls
    /// outside the range but within the configured ratio of it.
    fn baseline(
        &self,
        range: &PriceRange,
        reference: Option<&BenchmarkReference>,
    ) -> (Decimal, BaselineSource) {
        let ratio = self.config.catalog_override_ratio;
        match reference {
            Some(r)
                if !range.contains(r.value)
                    && range.low.checked_div(ratio).is_none_or(|min| r.value >= min)
                    && range.high.checked_mul(ratio).is_none_or(|max| r.value <= max) =>
            {
                (r.value, BaselineSource::Catalog)
            }
            _ => (range.midpoint(), BaselineSource::RangeMidpoint),
        }
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_decimal(multiplier: f64) -> Decimal {
    Decimal::try_from(multiplier).unwrap_or(Decimal::ONE)
}
