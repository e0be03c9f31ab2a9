//! Pricing profile: which catalog slice an estimate is priced against.

use serde::Serialize;

use crate::catalog::Sector;
use crate::context::{ProjectContext, ProjectType, ScaleTier};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingProfile {
    pub sector: Sector,
    pub tier: ScaleTier,
    pub project_type: Option<ProjectType>,
    /// True when the tier came from the context rather than the default.
    pub tier_from_context: bool,
}

impl PricingProfile {
    /// Resolve the profile for a raw sector name. Unknown sectors map to
    /// [`Sector::Other`].
    pub fn resolve(sector: &str, context: &ProjectContext, default_tier: ScaleTier) -> Self {
        let scale = context.scale_override();
        Self {
            sector: Sector::resolve(sector),
            tier: scale.unwrap_or(default_tier),
            project_type: context.project_type(),
            tier_from_context: scale.is_some(),
        }
    }

    /// Short human-readable label, e.g. `construccion/medium/reforma`.
    pub fn label(&self) -> String {
        match self.project_type {
            Some(kind) => format!("{}/{}/{}", self.sector, self.tier, kind),
            None => format!("{}/{}", self.sector, self.tier),
        }
    }
}
