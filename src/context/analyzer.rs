//! Folds detector signals into a [`ProjectContext`].

use tracing::debug;

use super::detectors::{DetectionInput, Detector, Signal, default_detectors};
use super::ProjectContext;
use crate::catalog::Sector;
use crate::text::normalize;

/// Runs every detector over a description and merges the result with any
/// previously known context.
pub struct ContextAnalyzer {
    detectors: Vec<Box<dyn Detector>>,
}

impl ContextAnalyzer {
    /// Analyzer with the built-in detector set.
    pub fn new() -> Self {
        Self::with_detectors(default_detectors())
    }

    pub fn with_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Names of the registered detectors, in evaluation order.
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Build a context from `description`.
    ///
    /// Signals from `existing` are kept unless the new text yields a more
    /// severe one. An unknown `sector` is treated as absent. Never fails:
    /// empty or unrecognizable text yields the neutral context (or `existing`
    /// unchanged).
    pub fn analyze(
        &self,
        description: &str,
        existing: Option<&ProjectContext>,
        location: Option<&str>,
        sector: Option<&str>,
    ) -> ProjectContext {
        let text = normalize(description);
        let location = location.map(normalize);
        let sector = sector
            .map(Sector::resolve)
            .filter(|s| *s != Sector::Other);

        let input = DetectionInput {
            text: &text,
            location: location.as_deref(),
            sector,
        };

        let detected = self
            .detectors
            .iter()
            .fold(Signal::default(), |acc, detector| {
                let signal = detector.detect(&input);
                if !signal.is_empty() {
                    debug!(detector = detector.name(), ?signal, "Context signal detected");
                }
                acc.merge(signal)
            });

        let merged = match existing {
            Some(prior) => Signal::from(prior).merge(detected),
            None => detected,
        };

        let context = ProjectContext::from(merged);
        debug!(
            scale = ?context.scale_override(),
            urgency = context.urgency_multiplier(),
            location = context.location_multiplier(),
            timeline_weeks = ?context.timeline_weeks(),
            "Project context analyzed"
        );
        context
    }
}

impl Default for ContextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
