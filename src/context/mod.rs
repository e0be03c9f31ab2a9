//! Project context: scale, urgency, location and volatility signals extracted
//! from free-text project descriptions.
//!
//! A [`ProjectContext`] is produced by the [`ContextAnalyzer`] and consumed by
//! the cost estimator. It carries no hidden state: the same inputs always
//! produce the same context.

mod analyzer;
mod detectors;
mod regions;

pub use analyzer::ContextAnalyzer;
pub use detectors::{
    AreaDetector, AreaThresholds, COMMODITY_WARNING, DeadlineDetector, DetectionInput, Detector,
    LocationDetector, MATERIALS_WARNING, PhaseDetector, ProjectTypeDetector, Signal,
    SmallScopeDetector, TurnkeyDetector, VolatilityDetector, WorkstreamDetector,
    default_detectors,
};
pub use regions::{REGIONS, Region, best_region};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest value any multiplier may take.
pub const MULTIPLIER_FLOOR: f64 = 1.0;
/// Upper bound for the urgency multiplier, whatever the text says.
pub const URGENCY_CEILING: f64 = 1.30;
/// Upper bound for the location multiplier.
pub const LOCATION_CEILING: f64 = 1.25;
/// Urgency applied to deadlines of two weeks or less.
pub const URGENCY_CRITICAL: f64 = 1.25;
/// Urgency applied to deadlines of four weeks or less, or urgent wording.
pub const URGENCY_ELEVATED: f64 = 1.12;

/// Project size tier. Ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleTier {
    Small,
    Medium,
    Enterprise,
}

impl ScaleTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleTier::Small => "small",
            ScaleTier::Medium => "medium",
            ScaleTier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for ScaleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScaleTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "pequeno" => Ok(ScaleTier::Small),
            "medium" | "mediano" => Ok(ScaleTier::Medium),
            "enterprise" | "grande" => Ok(ScaleTier::Enterprise),
            _ => Err(format!(
                "invalid scale tier '{}', expected 'small', 'medium' or 'enterprise'",
                s
            )),
        }
    }
}

/// Kind of building work, used to pick per-type catalog prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Residencial,
    Industrial,
    Comercial,
    Rehabilitacion,
    Reforma,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Residencial => "residencial",
            ProjectType::Industrial => "industrial",
            ProjectType::Comercial => "comercial",
            ProjectType::Rehabilitacion => "rehabilitacion",
            ProjectType::Reforma => "reforma",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals derived from a project description.
///
/// Multipliers are always read through accessors that keep them inside
/// `[MULTIPLIER_FLOOR, ceiling]`, so a context deserialized from an external
/// source cannot push the estimator outside its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    #[serde(default)]
    scale_override: Option<ScaleTier>,
    #[serde(default = "neutral_multiplier")]
    urgency_multiplier: f64,
    #[serde(default)]
    timeline_weeks: Option<u32>,
    #[serde(default = "neutral_multiplier")]
    location_multiplier: f64,
    #[serde(default)]
    fluctuation_warning: Option<String>,
    #[serde(default)]
    project_type: Option<ProjectType>,
}

fn neutral_multiplier() -> f64 {
    MULTIPLIER_FLOOR
}

/// Clamp a multiplier into `[MULTIPLIER_FLOOR, ceiling]`; non-finite values
/// collapse to the floor.
pub(crate) fn clamp_multiplier(value: f64, ceiling: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MULTIPLIER_FLOOR, ceiling)
    } else {
        MULTIPLIER_FLOOR
    }
}

impl ProjectContext {
    /// Context with no detected signals.
    pub fn neutral() -> Self {
        Self {
            scale_override: None,
            urgency_multiplier: MULTIPLIER_FLOOR,
            timeline_weeks: None,
            location_multiplier: MULTIPLIER_FLOOR,
            fluctuation_warning: None,
            project_type: None,
        }
    }

    pub fn with_scale_override(mut self, tier: ScaleTier) -> Self {
        self.scale_override = Some(tier);
        self
    }

    pub fn with_urgency(mut self, multiplier: f64) -> Self {
        self.urgency_multiplier = clamp_multiplier(multiplier, URGENCY_CEILING);
        self
    }

    pub fn with_timeline_weeks(mut self, weeks: u32) -> Self {
        self.timeline_weeks = (weeks > 0).then_some(weeks);
        self
    }

    pub fn with_location(mut self, multiplier: f64) -> Self {
        self.location_multiplier = clamp_multiplier(multiplier, LOCATION_CEILING);
        self
    }

    pub fn with_fluctuation_warning(mut self, warning: impl Into<String>) -> Self {
        let warning = warning.into();
        self.fluctuation_warning = (!warning.trim().is_empty()).then_some(warning);
        self
    }

    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = Some(project_type);
        self
    }

    pub fn scale_override(&self) -> Option<ScaleTier> {
        self.scale_override
    }

    pub fn urgency_multiplier(&self) -> f64 {
        clamp_multiplier(self.urgency_multiplier, URGENCY_CEILING)
    }

    pub fn timeline_weeks(&self) -> Option<u32> {
        self.timeline_weeks.filter(|w| *w > 0)
    }

    pub fn location_multiplier(&self) -> f64 {
        clamp_multiplier(self.location_multiplier, LOCATION_CEILING)
    }

    pub fn fluctuation_warning(&self) -> Option<&str> {
        self.fluctuation_warning
            .as_deref()
            .filter(|w| !w.trim().is_empty())
    }

    pub fn project_type(&self) -> Option<ProjectType> {
        self.project_type
    }

    /// True when the urgency sits in the highest band.
    pub fn is_critical_urgency(&self) -> bool {
        self.urgency_multiplier() >= URGENCY_CRITICAL
    }

    /// True when no signal was detected.
    pub fn is_neutral(&self) -> bool {
        self.scale_override.is_none()
            && self.urgency_multiplier() == MULTIPLIER_FLOOR
            && self.timeline_weeks().is_none()
            && self.location_multiplier() == MULTIPLIER_FLOOR
            && self.fluctuation_warning().is_none()
            && self.project_type.is_none()
    }
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self::neutral()
    }
}

impl From<Signal> for ProjectContext {
    fn from(signal: Signal) -> Self {
        let mut context = ProjectContext::neutral();
        context.scale_override = signal.scale;
        if let Some(urgency) = signal.urgency {
            context = context.with_urgency(urgency);
        }
        if let Some(weeks) = signal.timeline_weeks {
            context = context.with_timeline_weeks(weeks);
        }
        if let Some(location) = signal.location {
            context = context.with_location(location);
        }
        if let Some(warning) = signal.warning {
            context = context.with_fluctuation_warning(warning);
        }
        context.project_type = signal.project_type;
        context
    }
}

impl From<&ProjectContext> for Signal {
    fn from(context: &ProjectContext) -> Self {
        let urgency = context.urgency_multiplier();
        let location = context.location_multiplier();
        Signal {
            scale: context.scale_override(),
            urgency: (urgency > MULTIPLIER_FLOOR).then_some(urgency),
            timeline_weeks: context.timeline_weeks(),
            location: (location > MULTIPLIER_FLOOR).then_some(location),
            warning: context.fluctuation_warning().map(str::to_string),
            project_type: context.project_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_default() {
        let context = ProjectContext::default();
        assert!(context.is_neutral());
        assert_eq!(context.urgency_multiplier(), 1.0);
        assert_eq!(context.location_multiplier(), 1.0);
        assert_eq!(context.scale_override(), None);
        assert_eq!(context.fluctuation_warning(), None);
    }

    #[test]
    fn test_multipliers_are_clamped() {
        let context = ProjectContext::neutral()
            .with_urgency(9.0)
            .with_location(0.2);
        assert_eq!(context.urgency_multiplier(), URGENCY_CEILING);
        assert_eq!(context.location_multiplier(), MULTIPLIER_FLOOR);

        let context = ProjectContext::neutral().with_urgency(f64::NAN);
        assert_eq!(context.urgency_multiplier(), MULTIPLIER_FLOOR);
    }

    #[test]
    fn test_deserialized_context_is_bounded() {
        let json = r#"{"urgencyMultiplier": 40.0, "locationMultiplier": -3.0, "timelineWeeks": 0}"#;
        let context: ProjectContext = serde_json::from_str(json).unwrap();
        assert_eq!(context.urgency_multiplier(), URGENCY_CEILING);
        assert_eq!(context.location_multiplier(), MULTIPLIER_FLOOR);
        assert_eq!(context.timeline_weeks(), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let context = ProjectContext::neutral()
            .with_scale_override(ScaleTier::Enterprise)
            .with_timeline_weeks(2);
        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["scaleOverride"], "enterprise");
        assert_eq!(value["timelineWeeks"], 2);
        assert_eq!(value["urgencyMultiplier"], 1.0);
    }

    #[test]
    fn test_signal_round_trip_keeps_severity() {
        let context = ProjectContext::neutral()
            .with_urgency(1.12)
            .with_location(1.15)
            .with_fluctuation_warning("precios volátiles");
        let signal = Signal::from(&context);
        assert_eq!(signal.urgency, Some(1.12));
        assert_eq!(ProjectContext::from(signal), context);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(ScaleTier::Enterprise > ScaleTier::Medium);
        assert!(ScaleTier::Medium > ScaleTier::Small);
        assert_eq!("grande".parse::<ScaleTier>().unwrap(), ScaleTier::Enterprise);
    }
}
