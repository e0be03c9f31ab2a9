//! Benchmark catalog: static baseline prices per sector, role and task.
//!
//! The catalog is loaded once (either the built-in seed data or a JSON file)
//! and is read-only afterwards, so it can be shared between concurrent
//! estimations without locking.

mod seed;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::{ProjectType, ScaleTier};
use crate::error::CatalogError;
use crate::estimation::MAX_AMOUNT;
use crate::text::normalize;

static SEEDED: LazyLock<Arc<BenchmarkCatalog>> =
    LazyLock::new(|| Arc::new(BenchmarkCatalog::from_sectors_unchecked(seed::sectors())));

/// Canonical sector a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Construccion,
    Arquitectura,
    Instalaciones,
    Software,
    Diseno,
    Marketing,
    Consultoria,
    /// Fallback for sectors the catalog does not know.
    Other,
}

/// Keyword fragments that identify each sector, checked in order.
const SECTOR_KEYWORDS: &[(Sector, &[&str])] = &[
    (
        Sector::Instalaciones,
        &[
            "instalacion",
            "fontaner",
            "electric",
            "climatiz",
            "fotovolta",
            "solar",
            "calefaccion",
            "carpinteria metalica",
        ],
    ),
    (Sector::Arquitectura, &["arquitect", "interioris", "urbanis"]),
    (
        Sector::Construccion,
        &["constru", "obra", "reforma", "albanil", "rehabilit", "edifica"],
    ),
    (Sector::Diseno, &["diseno", "grafico", "branding", "ilustracion"]),
    (
        Sector::Software,
        &[
            "software",
            "desarrollo",
            "programacion",
            "web",
            "app",
            "tecnolog",
            "informatic",
            "saas",
        ],
    ),
    (
        Sector::Marketing,
        &["marketing", "publicidad", "redes sociales", "seo", "comunicacion"],
    ),
    (Sector::Consultoria, &["consultor", "asesor", "auditor"]),
];

impl Sector {
    /// Resolve free-form sector text; unknown sectors map to [`Sector::Other`].
    pub fn resolve(raw: &str) -> Self {
        let text = normalize(raw);
        let text = text.trim();
        if text.is_empty() {
            return Sector::Other;
        }
        if let Ok(exact) = text.parse::<Sector>() {
            return exact;
        }
        SECTOR_KEYWORDS
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| text.contains(k)))
            .map(|(sector, _)| *sector)
            .unwrap_or(Sector::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Construccion => "construccion",
            Sector::Arquitectura => "arquitectura",
            Sector::Instalaciones => "instalaciones",
            Sector::Software => "software",
            Sector::Diseno => "diseno",
            Sector::Marketing => "marketing",
            Sector::Consultoria => "consultoria",
            Sector::Other => "other",
        }
    }

    /// Sectors whose pricing is driven by surface area and building materials.
    pub fn is_construction_like(&self) -> bool {
        matches!(
            self,
            Sector::Construccion | Sector::Arquitectura | Sector::Instalaciones
        )
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "construccion" => Ok(Sector::Construccion),
            "arquitectura" => Ok(Sector::Arquitectura),
            "instalaciones" => Ok(Sector::Instalaciones),
            "software" => Ok(Sector::Software),
            "diseno" => Ok(Sector::Diseno),
            "marketing" => Ok(Sector::Marketing),
            "consultoria" => Ok(Sector::Consultoria),
            "other" | "otro" | "otros" => Ok(Sector::Other),
            _ => Err(format!("unknown sector '{}'", s)),
        }
    }
}

/// Identity of a benchmark entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkKey {
    pub sector: Sector,
    pub role: String,
    pub task: String,
}

impl fmt::Display for BenchmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.sector, self.role, self.task)
    }
}

/// Per-project-type prices that replace the entry average when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectTypeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residencial: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industrial: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comercial: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehabilitacion: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reforma: Option<Decimal>,
}

impl ProjectTypeOverrides {
    pub fn get(&self, project_type: ProjectType) -> Option<Decimal> {
        match project_type {
            ProjectType::Residencial => self.residencial,
            ProjectType::Industrial => self.industrial,
            ProjectType::Comercial => self.comercial,
            ProjectType::Rehabilitacion => self.rehabilitacion,
            ProjectType::Reforma => self.reforma,
        }
    }

    fn values(&self) -> impl Iterator<Item = Decimal> {
        [
            self.residencial,
            self.industrial,
            self.comercial,
            self.rehabilitacion,
            self.reforma,
        ]
        .into_iter()
        .flatten()
    }
}

/// A single benchmark price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub role: String,
    pub task: String,
    /// Baseline price for a small project.
    pub average: Decimal,
    #[serde(default)]
    pub overrides: ProjectTypeOverrides,
}

impl BenchmarkEntry {
    /// Baseline for the given project type, falling back to the average.
    pub fn base_for(&self, project_type: Option<ProjectType>) -> Decimal {
        project_type
            .and_then(|t| self.overrides.get(t))
            .unwrap_or(self.average)
    }
}

/// Multipliers turning a small-project baseline into a scale-specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub small: Decimal,
    pub medium: Decimal,
    pub enterprise: Decimal,
}

impl ScaleFactors {
    pub fn for_tier(&self, tier: ScaleTier) -> Decimal {
        match tier {
            ScaleTier::Small => self.small,
            ScaleTier::Medium => self.medium,
            ScaleTier::Enterprise => self.enterprise,
        }
    }
}

/// All benchmarks of one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorBenchmarks {
    pub sector: Sector,
    pub scale_factors: ScaleFactors,
    pub entries: Vec<BenchmarkEntry>,
}

/// Catalog value resolved for a profile, with the entries that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReference {
    pub value: Decimal,
    pub contributors: Vec<BenchmarkKey>,
}

/// Immutable lookup of sector benchmarks.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkCatalog {
    sectors: HashMap<Sector, SectorBenchmarks>,
}

impl BenchmarkCatalog {
    /// Shared handle to the built-in seed catalog.
    pub fn seeded() -> Arc<BenchmarkCatalog> {
        Arc::clone(&SEEDED)
    }

    /// Build a catalog from sector tables after validating them.
    pub fn from_sectors(sectors: Vec<SectorBenchmarks>) -> Result<Self, CatalogError> {
        for table in &sectors {
            validate(table)?;
        }
        Ok(Self::from_sectors_unchecked(sectors))
    }

    /// Load a catalog from a JSON array of sector tables.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let sectors: Vec<SectorBenchmarks> = serde_json::from_str(json)?;
        Self::from_sectors(sectors)
    }

    fn from_sectors_unchecked(sectors: Vec<SectorBenchmarks>) -> Self {
        let mut map: HashMap<Sector, SectorBenchmarks> = HashMap::new();
        for table in sectors {
            match map.get_mut(&table.sector) {
                Some(existing) => existing.entries.extend(table.entries),
                None => {
                    map.insert(table.sector, table);
                }
            }
        }
        Self { sectors: map }
    }

    /// Whether the catalog holds any benchmark for `sector`.
    pub fn covers(&self, sector: Sector) -> bool {
        self.entries(sector).next().is_some()
    }

    pub fn entries(&self, sector: Sector) -> impl Iterator<Item = &BenchmarkEntry> {
        self.sectors
            .get(&sector)
            .into_iter()
            .flat_map(|table| table.entries.iter())
    }

    /// Find an entry by role and task (case and accent insensitive).
    pub fn lookup(&self, sector: Sector, role: &str, task: &str) -> Option<&BenchmarkEntry> {
        let role = normalize(role);
        let task = normalize(task);
        self.entries(sector)
            .find(|e| normalize(&e.role) == role && normalize(&e.task) == task)
    }

    /// Scale-specific reference price for a sector: the mean of every entry's
    /// project-type baseline scaled to `tier`.
    pub fn reference(
        &self,
        sector: Sector,
        tier: ScaleTier,
        project_type: Option<ProjectType>,
    ) -> Option<BenchmarkReference> {
        let table = self.sectors.get(&sector)?;
        if table.entries.is_empty() {
            return None;
        }

        let factor = table.scale_factors.for_tier(tier);
        let total = table.entries.iter().try_fold(Decimal::ZERO, |acc, e| {
            e.base_for(project_type)
                .checked_mul(factor)
                .and_then(|v| acc.checked_add(v))
        })?;
        let value = (total / Decimal::from(table.entries.len())).round_dp(2);

        let contributors = table
            .entries
            .iter()
            .map(|e| BenchmarkKey {
                sector,
                role: e.role.clone(),
                task: e.task.clone(),
            })
            .collect();

        Some(BenchmarkReference {
            value,
            contributors,
        })
    }

    /// Number of entries across all sectors.
    pub fn len(&self) -> usize {
        self.sectors.values().map(|t| t.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate(table: &SectorBenchmarks) -> Result<(), CatalogError> {
    let factors = table.scale_factors;
    if factors.small <= Decimal::ZERO
        || factors.medium < factors.small
        || factors.enterprise < factors.medium
    {
        return Err(CatalogError::InvalidScaleFactors {
            sector: table.sector.to_string(),
            reason: "factors must be positive and non-decreasing by tier".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for entry in &table.entries {
        let invalid = |reason: &str| CatalogError::InvalidEntry {
            sector: table.sector.to_string(),
            role: entry.role.clone(),
            task: entry.task.clone(),
            reason: reason.to_string(),
        };

        if entry.average <= Decimal::ZERO {
            return Err(invalid("average must be positive"));
        }
        if entry.overrides.values().any(|v| v <= Decimal::ZERO) {
            return Err(invalid("overrides must be positive"));
        }
        if entry.average > MAX_AMOUNT || entry.overrides.values().any(|v| v > MAX_AMOUNT) {
            return Err(invalid("price exceeds the maximum amount"));
        }
        if !seen.insert((normalize(&entry.role), normalize(&entry.task))) {
            return Err(CatalogError::DuplicateEntry {
                sector: table.sector.to_string(),
                role: entry.role.clone(),
                task: entry.task.clone(),
            });
        }
    }
    Ok(())
}
