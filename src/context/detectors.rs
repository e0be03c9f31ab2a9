//! Detector rules that turn normalized text into partial context signals.
//!
//! Each detector looks at one kind of evidence and returns a [`Signal`] with
//! only the fields it is responsible for. The analyzer folds them together with
//! [`Signal::merge`], so the "more severe wins" policy lives in one place.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    ProjectType, ScaleTier, URGENCY_CEILING, URGENCY_CRITICAL, URGENCY_ELEVATED, best_region,
    clamp_multiplier,
};
use crate::catalog::Sector;
use crate::text::{number_word, parse_amount, tokens};

static AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d.,]*)\s*(?:m2|mts2|mt2|metros cuadrados|metros2|sqm)\b")
        .expect("area pattern is valid")
});

static PHASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:por|en|varias|multiples|diferentes|distintas|dos|tres|cuatro|\d+)\s+(?:fases|etapas)\b|\bfase\s+(?:[2-9]|ii|iii|dos|tres)\b|\bmultifase\b|\b(?:multiple|several|in)\s+phases\b",
    )
    .expect("phase pattern is valid")
});

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d{1,3}|un|uno|una|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez|once|doce|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s*(semanas?|weeks?|dias?|days?|meses|mes|months?)\b",
    )
    .expect("duration pattern is valid")
});

fn phrase_matcher(phrases: &[&str]) -> AhoCorasick {
    AhoCorasick::new(phrases).expect("static phrase list builds a matcher")
}

/// Whether normalized `text` mentions `phrase`: whole-token match for single
/// words, substring match for multi-word phrases.
fn mentions(text: &str, phrase: &str) -> bool {
    if phrase.contains(' ') {
        text.contains(phrase)
    } else {
        tokens(text).any(|t| t == phrase)
    }
}

fn max_opt<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

fn max_f64(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

fn min_opt<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

/// Partial context produced by a single detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signal {
    pub scale: Option<ScaleTier>,
    pub urgency: Option<f64>,
    pub timeline_weeks: Option<u32>,
    pub location: Option<f64>,
    pub warning: Option<String>,
    pub project_type: Option<ProjectType>,
}

impl Signal {
    pub fn is_empty(&self) -> bool {
        *self == Signal::default()
    }

    /// Combine with a newer signal, keeping the more severe value per field.
    ///
    /// Larger tier and multipliers win, the shorter timeline wins, and the
    /// newer warning or project type replaces the older one only when present.
    pub fn merge(self, newer: Signal) -> Signal {
        Signal {
            scale: max_opt(self.scale, newer.scale),
            urgency: max_f64(self.urgency, newer.urgency),
            timeline_weeks: min_opt(self.timeline_weeks, newer.timeline_weeks),
            location: max_f64(self.location, newer.location),
            warning: newer.warning.or(self.warning),
            project_type: newer.project_type.or(self.project_type),
        }
    }
}

/// What a detector gets to look at. All text is already normalized.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub text: &'a str,
    pub location: Option<&'a str>,
    /// Resolved sector; `None` when the caller gave none or it is unknown.
    pub sector: Option<Sector>,
}

/// A single independent detection rule.
pub trait Detector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn detect(&self, input: &DetectionInput<'_>) -> Signal;
}

/// Area thresholds in square metres.
#[derive(Debug, Clone, Copy)]
pub struct AreaThresholds {
    pub medium: Decimal,
    pub enterprise: Decimal,
}

/// Explicit square-metre figures compared against sector thresholds.
pub struct AreaDetector {
    construction: AreaThresholds,
    general: AreaThresholds,
}

impl AreaDetector {
    pub fn new(construction: AreaThresholds, general: AreaThresholds) -> Self {
        Self {
            construction,
            general,
        }
    }
}

impl Default for AreaDetector {
    fn default() -> Self {
        Self::new(
            AreaThresholds {
                medium: dec!(100),
                enterprise: dec!(300),
            },
            AreaThresholds {
                medium: dec!(150),
                enterprise: dec!(500),
            },
        )
    }
}

impl Detector for AreaDetector {
    fn name(&self) -> &'static str {
        "area"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let Some(largest) = AREA_RE
            .captures_iter(input.text)
            .filter_map(|caps| parse_amount(&caps[1]))
            .max()
        else {
            return Signal::default();
        };

        let thresholds = if input.sector.is_some_and(|s| s.is_construction_like()) {
            self.construction
        } else {
            self.general
        };

        let scale = if largest >= thresholds.enterprise {
            Some(ScaleTier::Enterprise)
        } else if largest >= thresholds.medium {
            Some(ScaleTier::Medium)
        } else {
            None
        };

        Signal {
            scale,
            ..Default::default()
        }
    }
}

const TURNKEY_PHRASES: &[(&str, ScaleTier)] = &[
    ("llave en mano", ScaleTier::Enterprise),
    ("turnkey", ScaleTier::Enterprise),
    ("end to end", ScaleTier::Enterprise),
    ("end-to-end", ScaleTier::Enterprise),
    ("integral", ScaleTier::Medium),
    ("proyecto completo", ScaleTier::Medium),
    ("obra completa", ScaleTier::Medium),
];

/// Turnkey and "integral" phrasing.
pub struct TurnkeyDetector {
    matcher: AhoCorasick,
}

impl TurnkeyDetector {
    pub fn new() -> Self {
        let phrases: Vec<&str> = TURNKEY_PHRASES.iter().map(|(p, _)| *p).collect();
        Self {
            matcher: phrase_matcher(&phrases),
        }
    }
}

impl Default for TurnkeyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for TurnkeyDetector {
    fn name(&self) -> &'static str {
        "turnkey"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let scale = self
            .matcher
            .find_overlapping_iter(input.text)
            .map(|mat| TURNKEY_PHRASES[mat.pattern().as_usize()].1)
            .max();
        Signal {
            scale,
            ..Default::default()
        }
    }
}

/// Multi-phase delivery language.
#[derive(Default)]
pub struct PhaseDetector;

impl Detector for PhaseDetector {
    fn name(&self) -> &'static str {
        "phases"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        Signal {
            scale: PHASE_RE
                .is_match(input.text)
                .then_some(ScaleTier::Enterprise),
            ..Default::default()
        }
    }
}

/// Groups of keywords; each group is one parallel work stream.
const WORKSTREAMS: &[&[&str]] = &[
    &["electricidad", "instalacion electrica"],
    &["fontaneria", "saneamiento"],
    &["carpinteria"],
    &["pintura"],
    &["climatizacion", "aire acondicionado", "calefaccion"],
    &["albanileria", "tabiqueria"],
    &["solado", "alicatado", "pavimento"],
    &["cubierta", "tejado"],
    &["frontend", "front-end"],
    &["backend", "back-end"],
    &["app movil", "aplicacion movil", "android"],
    &["integracion", "integraciones"],
    &["panel de administracion", "backoffice"],
    &["pasarela de pago"],
];

/// Number of simultaneous work streams enumerated in the description.
pub struct WorkstreamDetector {
    matcher: AhoCorasick,
    group_of: Vec<usize>,
}

impl WorkstreamDetector {
    /// Streams needed for a medium tier.
    pub const MEDIUM_STREAMS: usize = 2;
    /// Streams needed for an enterprise tier.
    pub const ENTERPRISE_STREAMS: usize = 4;

    pub fn new() -> Self {
        let mut phrases = Vec::new();
        let mut group_of = Vec::new();
        for (group, keywords) in WORKSTREAMS.iter().enumerate() {
            for keyword in keywords.iter() {
                phrases.push(*keyword);
                group_of.push(group);
            }
        }
        Self {
            matcher: phrase_matcher(&phrases),
            group_of,
        }
    }
}

impl Default for WorkstreamDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for WorkstreamDetector {
    fn name(&self) -> &'static str {
        "workstreams"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let mut groups: Vec<usize> = self
            .matcher
            .find_overlapping_iter(input.text)
            .map(|mat| self.group_of[mat.pattern().as_usize()])
            .collect();
        groups.sort_unstable();
        groups.dedup();

        let scale = match groups.len() {
            n if n >= Self::ENTERPRISE_STREAMS => Some(ScaleTier::Enterprise),
            n if n >= Self::MEDIUM_STREAMS => Some(ScaleTier::Medium),
            _ => None,
        };
        Signal {
            scale,
            ..Default::default()
        }
    }
}

const SMALL_SCOPE_PHRASES: &[&str] = &[
    "pequeno",
    "pequena",
    "sencillo",
    "sencilla",
    "basico",
    "basica",
    "landing page",
    "una sola pagina",
    "retoque",
    "arreglo",
];

/// Explicitly small scope. Loses against any larger cue.
pub struct SmallScopeDetector {
    matcher: AhoCorasick,
}

impl SmallScopeDetector {
    pub fn new() -> Self {
        Self {
            matcher: phrase_matcher(SMALL_SCOPE_PHRASES),
        }
    }
}

impl Default for SmallScopeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SmallScopeDetector {
    fn name(&self) -> &'static str {
        "small_scope"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        Signal {
            scale: self
                .matcher
                .is_match(input.text)
                .then_some(ScaleTier::Small),
            ..Default::default()
        }
    }
}

const URGENT_PHRASES: &[&str] = &[
    "urgente",
    "urgencia",
    "cuanto antes",
    "lo antes posible",
    "asap",
    "inmediat",
    "contrarreloj",
    "a la mayor brevedad",
];

/// Deadline wording and explicit durations.
pub struct DeadlineDetector {
    urgent: AhoCorasick,
}

impl DeadlineDetector {
    pub fn new() -> Self {
        Self {
            urgent: phrase_matcher(URGENT_PHRASES),
        }
    }

    /// Smallest positive duration stated in the text, in whole weeks.
    pub fn shortest_weeks(text: &str) -> Option<u32> {
        DURATION_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let amount = caps[1]
                    .parse::<u32>()
                    .ok()
                    .or_else(|| number_word(&caps[1]))?;
                if amount == 0 {
                    return None;
                }
                let unit = &caps[2];
                let weeks = if unit.starts_with("semana") || unit.starts_with("week") {
                    amount
                } else if unit.starts_with("dia") || unit.starts_with("day") {
                    amount.div_ceil(7)
                } else {
                    amount.saturating_mul(4)
                };
                Some(weeks.max(1))
            })
            .min()
    }

    /// Urgency band for a deadline.
    pub fn band_for_weeks(weeks: u32) -> Option<f64> {
        match weeks {
            0..=2 => Some(URGENCY_CRITICAL),
            3..=4 => Some(URGENCY_ELEVATED),
            _ => None,
        }
    }
}

impl Default for DeadlineDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DeadlineDetector {
    fn name(&self) -> &'static str {
        "deadline"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let timeline_weeks = Self::shortest_weeks(input.text);
        let from_deadline = timeline_weeks.and_then(Self::band_for_weeks);
        let from_wording = self
            .urgent
            .is_match(input.text)
            .then_some(URGENCY_ELEVATED);

        Signal {
            urgency: max_f64(from_deadline, from_wording)
                .map(|u| clamp_multiplier(u, URGENCY_CEILING)),
            timeline_weeks,
            ..Default::default()
        }
    }
}

/// Region lookup on the location string, then on the description.
#[derive(Default)]
pub struct LocationDetector;

impl Detector for LocationDetector {
    fn name(&self) -> &'static str {
        "location"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let region = input
            .location
            .and_then(best_region)
            .or_else(|| best_region(input.text));
        Signal {
            location: region.map(|r| r.multiplier).filter(|m| *m > 1.0),
            ..Default::default()
        }
    }
}

/// Keywords per project type, in precedence order.
const PROJECT_TYPES: &[(ProjectType, &[&str])] = &[
    (
        ProjectType::Rehabilitacion,
        &["rehabilitacion", "rehabilitar", "restauracion", "fachada", "fachadas"],
    ),
    (
        ProjectType::Industrial,
        &["nave", "naves", "industrial", "fabrica", "almacen", "poligono"],
    ),
    (
        ProjectType::Comercial,
        &["local comercial", "comercial", "tienda", "oficina", "oficinas", "restaurante", "hotel"],
    ),
    (
        ProjectType::Reforma,
        &["reforma", "reformar", "renovacion", "renovar"],
    ),
    (
        ProjectType::Residencial,
        &[
            "vivienda",
            "viviendas",
            "piso",
            "casa",
            "chalet",
            "residencial",
            "apartamento",
            "adosado",
        ],
    ),
];

/// Building project type. Only applies to building sectors or unknown ones.
#[derive(Default)]
pub struct ProjectTypeDetector;

impl Detector for ProjectTypeDetector {
    fn name(&self) -> &'static str {
        "project_type"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        if input.sector.is_some_and(|s| !s.is_construction_like()) {
            return Signal::default();
        }
        let project_type = PROJECT_TYPES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| mentions(input.text, k)))
            .map(|(kind, _)| *kind);
        Signal {
            project_type,
            ..Default::default()
        }
    }
}

pub const COMMODITY_WARNING: &str = "Los precios de materiales y equipos de este oficio dependen de materias primas (cobre, acero, paneles) y pueden variar entre la emisión del presupuesto y la ejecución.";
pub const MATERIALS_WARNING: &str = "El presupuesto incluye materiales con precios volátiles o importados; conviene revisar la partida de materiales antes de la firma.";

const COMMODITY_TRADES: &[&str] = &[
    "fotovoltaica",
    "placas solares",
    "paneles solares",
    "energia solar",
    "electricidad",
    "instalacion electrica",
    "fontaneria",
    "carpinteria metalica",
];

const MATERIAL_TERMS: &[&str] = &[
    "material",
    "importad",
    "acero",
    "cobre",
    "aluminio",
    "hormigon",
    "madera",
    "cemento",
    "ceramica",
    "porcelanico",
    "marmol",
];

const BUILDING_TERMS: &[&str] = &["obra", "reforma", "construccion", "rehabilitacion", "edificio"];

/// Price-volatility advisory for commodity-linked trades and material-heavy
/// building work.
pub struct VolatilityDetector {
    commodity: AhoCorasick,
    materials: AhoCorasick,
    building: AhoCorasick,
}

impl VolatilityDetector {
    pub fn new() -> Self {
        Self {
            commodity: phrase_matcher(COMMODITY_TRADES),
            materials: phrase_matcher(MATERIAL_TERMS),
            building: phrase_matcher(BUILDING_TERMS),
        }
    }
}

impl Default for VolatilityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for VolatilityDetector {
    fn name(&self) -> &'static str {
        "volatility"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Signal {
        let text = input.text;
        let commodity_trade =
            input.sector == Some(Sector::Instalaciones) || self.commodity.is_match(text);
        let building_work = match input.sector {
            Some(sector) => sector.is_construction_like(),
            None => self.building.is_match(text),
        };

        let warning = if commodity_trade {
            Some(COMMODITY_WARNING)
        } else if building_work && self.materials.is_match(text) {
            Some(MATERIALS_WARNING)
        } else {
            None
        };
        Signal {
            warning: warning.map(str::to_string),
            ..Default::default()
        }
    }
}

/// The detector set used by [`ContextAnalyzer::new`](super::ContextAnalyzer::new).
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(AreaDetector::default()),
        Box::new(TurnkeyDetector::new()),
        Box::new(PhaseDetector),
        Box::new(WorkstreamDetector::new()),
        Box::new(SmallScopeDetector::new()),
        Box::new(DeadlineDetector::new()),
        Box::new(LocationDetector),
        Box::new(ProjectTypeDetector),
        Box::new(VolatilityDetector::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;
    use pretty_assertions::assert_eq;

    fn input<'a>(text: &'a str, sector: Option<Sector>) -> DetectionInput<'a> {
        DetectionInput {
            text,
            location: None,
            sector,
        }
    }

    #[test]
    fn test_area_thresholds_depend_on_sector() {
        let detector = AreaDetector::default();
        let text = normalize("Reforma de 320 m² en planta baja");

        let building = detector.detect(&input(&text, Some(Sector::Construccion)));
        assert_eq!(building.scale, Some(ScaleTier::Enterprise));

        let general = detector.detect(&input(&text, Some(Sector::Software)));
        assert_eq!(general.scale, Some(ScaleTier::Medium));

        let tiny = detector.detect(&input("local de 40 m2", None));
        assert_eq!(tiny.scale, None);
    }

    #[test]
    fn test_area_reads_thousands_separator() {
        let detector = AreaDetector::default();
        let signal = detector.detect(&input("nave de 1.200 metros cuadrados", None));
        assert_eq!(signal.scale, Some(ScaleTier::Enterprise));
    }

    #[test]
    fn test_turnkey_phrases() {
        let detector = TurnkeyDetector::new();
        assert_eq!(
            detector.detect(&input("entrega llave en mano", None)).scale,
            Some(ScaleTier::Enterprise)
        );
        assert_eq!(
            detector.detect(&input("reforma integral del bano", None)).scale,
            Some(ScaleTier::Medium)
        );
        assert!(detector.detect(&input("cambiar un grifo", None)).is_empty());
    }

    #[test]
    fn test_phase_language() {
        let detector = PhaseDetector;
        assert_eq!(
            detector.detect(&input("ejecucion por fases", None)).scale,
            Some(ScaleTier::Enterprise)
        );
        assert_eq!(
            detector.detect(&input("la fase 2 incluye el backend", None)).scale,
            Some(ScaleTier::Enterprise)
        );
        assert!(detector.detect(&input("una sola fase", None)).is_empty());
    }

    #[test]
    fn test_workstream_counts_distinct_groups() {
        let detector = WorkstreamDetector::new();
        let two = detector.detect(&input("electricidad y fontaneria", None));
        assert_eq!(two.scale, Some(ScaleTier::Medium));

        let four = detector.detect(&input(
            "electricidad, fontaneria, carpinteria y pintura",
            None,
        ));
        assert_eq!(four.scale, Some(ScaleTier::Enterprise));

        let same_group = detector.detect(&input("calefaccion y aire acondicionado", None));
        assert_eq!(same_group.scale, None);
    }

    #[test]
    fn test_deadline_bands() {
        let detector = DeadlineDetector::new();

        let critical = detector.detect(&input("entrega en 2 semanas", None));
        assert_eq!(critical.timeline_weeks, Some(2));
        assert_eq!(critical.urgency, Some(URGENCY_CRITICAL));

        let elevated = detector.detect(&input("plazo de un mes", None));
        assert_eq!(elevated.timeline_weeks, Some(4));
        assert_eq!(elevated.urgency, Some(URGENCY_ELEVATED));

        let relaxed = detector.detect(&input("plazo de 10 semanas", None));
        assert_eq!(relaxed.timeline_weeks, Some(10));
        assert_eq!(relaxed.urgency, None);
    }

    #[test]
    fn test_deadline_takes_shortest_duration() {
        assert_eq!(
            DeadlineDetector::shortest_weeks("fase uno en 10 dias, total 3 meses"),
            Some(2)
        );
        assert_eq!(DeadlineDetector::shortest_weeks("tres semanas"), Some(3));
        assert_eq!(DeadlineDetector::shortest_weeks("0 semanas"), None);
        assert_eq!(DeadlineDetector::shortest_weeks("sin plazo"), None);
    }

    #[test]
    fn test_urgent_wording_without_duration() {
        let detector = DeadlineDetector::new();
        let signal = detector.detect(&input("es urgente", None));
        assert_eq!(signal.urgency, Some(URGENCY_ELEVATED));
        assert_eq!(signal.timeline_weeks, None);

        let both = detector.detect(&input("urgente, en 1 semana", None));
        assert_eq!(both.urgency, Some(URGENCY_CRITICAL));
    }

    #[test]
    fn test_location_prefers_location_string() {
        let detector = LocationDetector;
        let signal = detector.detect(&DetectionInput {
            text: "oficina en zaragoza",
            location: Some("madrid"),
            sector: None,
        });
        assert_eq!(signal.location, Some(1.15));

        let from_text = detector.detect(&input("oficina en zaragoza", None));
        assert_eq!(from_text.location, Some(1.02));

        assert!(detector.detect(&input("oficina en soria", None)).is_empty());
    }

    #[test]
    fn test_project_type_precedence() {
        let detector = ProjectTypeDetector;
        let signal = detector.detect(&input("rehabilitacion de fachada de vivienda", None));
        assert_eq!(signal.project_type, Some(ProjectType::Rehabilitacion));

        let signal = detector.detect(&input("reforma de piso", Some(Sector::Construccion)));
        assert_eq!(signal.project_type, Some(ProjectType::Reforma));

        let software = detector.detect(&input("tienda online", Some(Sector::Software)));
        assert!(software.is_empty());
    }

    #[test]
    fn test_volatility_rules() {
        let detector = VolatilityDetector::new();

        let trade = detector.detect(&input("cambio de caldera", Some(Sector::Instalaciones)));
        assert_eq!(trade.warning.as_deref(), Some(COMMODITY_WARNING));

        let building = detector.detect(&input(
            "obra con acero importado",
            Some(Sector::Construccion),
        ));
        assert_eq!(building.warning.as_deref(), Some(MATERIALS_WARNING));

        let plain = detector.detect(&input("pintar paredes", Some(Sector::Construccion)));
        assert!(plain.warning.is_none());

        let software = detector.detect(&input("migrar datos de cobre", Some(Sector::Software)));
        assert!(software.warning.is_none());

        let from_text = detector.detect(&input("instalar placas solares", None));
        assert_eq!(from_text.warning.as_deref(), Some(COMMODITY_WARNING));

        let trade_in_building = detector.detect(&input(
            "reforma con fontaneria nueva",
            Some(Sector::Construccion),
        ));
        assert_eq!(trade_in_building.warning.as_deref(), Some(COMMODITY_WARNING));
    }

    #[test]
    fn test_merge_keeps_most_severe() {
        let older = Signal {
            scale: Some(ScaleTier::Enterprise),
            urgency: Some(1.12),
            timeline_weeks: Some(3),
            location: Some(1.15),
            warning: Some("antes".to_string()),
            project_type: Some(ProjectType::Industrial),
        };
        let newer = Signal {
            scale: Some(ScaleTier::Small),
            urgency: Some(1.25),
            timeline_weeks: Some(6),
            location: None,
            warning: None,
            project_type: Some(ProjectType::Reforma),
        };

        let merged = older.merge(newer);
        assert_eq!(merged.scale, Some(ScaleTier::Enterprise));
        assert_eq!(merged.urgency, Some(1.25));
        assert_eq!(merged.timeline_weeks, Some(3));
        assert_eq!(merged.location, Some(1.15));
        assert_eq!(merged.warning.as_deref(), Some("antes"));
        assert_eq!(merged.project_type, Some(ProjectType::Reforma));
    }
}
