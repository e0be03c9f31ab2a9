//! Cost estimation from a price-range hint, sector benchmarks and project
//! context.
//!
//! Estimates are based on:
//! - The client's stated budget range
//! - Scale-specific benchmark prices from the catalog
//! - Urgency and location multipliers from the [`ProjectContext`](crate::context::ProjectContext)

mod cost;
mod profile;
mod range;

pub use cost::CostEstimator;
pub use profile::PricingProfile;
pub use range::PriceRange;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::catalog::BenchmarkKey;

/// Largest amount, in euros, accepted as a range bound or catalog price.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Where the pre-multiplier baseline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BaselineSource {
    /// Midpoint of the client's range.
    RangeMidpoint,
    /// Catalog reference for the profile, used when the range looked off.
    Catalog,
}

/// A priced estimate with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub target_total: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub profile: PricingProfile,
    /// Parsed client range.
    pub range: PriceRange,
    /// Value before urgency and location multipliers.
    pub baseline: Decimal,
    pub baseline_source: BaselineSource,
    /// Catalog value for the profile, when the catalog covers the sector.
    pub catalog_reference: Option<Decimal>,
    /// Catalog entries behind the baseline. Empty when the range midpoint was used.
    pub contributions: Vec<BenchmarkKey>,
    pub urgency_multiplier: f64,
    pub location_multiplier: f64,
    pub fluctuation_warning: Option<String>,
}
