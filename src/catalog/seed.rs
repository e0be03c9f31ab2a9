//! Built-in benchmark seed data.
//!
//! Figures are heuristic small-project baselines in euros, not calibrated
//! market prices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{BenchmarkEntry, ProjectTypeOverrides, ScaleFactors, Sector, SectorBenchmarks};

fn entry(role: &str, task: &str, average: Decimal) -> BenchmarkEntry {
    BenchmarkEntry {
        role: role.to_string(),
        task: task.to_string(),
        average,
        overrides: ProjectTypeOverrides::default(),
    }
}

fn entry_with(
    role: &str,
    task: &str,
    average: Decimal,
    overrides: ProjectTypeOverrides,
) -> BenchmarkEntry {
    BenchmarkEntry {
        overrides,
        ..entry(role, task, average)
    }
}

pub(super) fn sectors() -> Vec<SectorBenchmarks> {
    vec![
        SectorBenchmarks {
            sector: Sector::Construccion,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.2),
                enterprise: dec!(5.0),
            },
            entries: vec![
                entry("Jefe de obra", "Dirección de obra", dec!(9000)),
                entry_with(
                    "Albañil",
                    "Reforma de baño",
                    dec!(7000),
                    ProjectTypeOverrides {
                        reforma: Some(dec!(7500)),
                        rehabilitacion: Some(dec!(9000)),
                        ..Default::default()
                    },
                ),
                entry_with(
                    "Contratista general",
                    "Reforma de vivienda",
                    dec!(35000),
                    ProjectTypeOverrides {
                        residencial: Some(dec!(32000)),
                        industrial: Some(dec!(60000)),
                        comercial: Some(dec!(40000)),
                        rehabilitacion: Some(dec!(45000)),
                        reforma: Some(dec!(30000)),
                    },
                ),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Arquitectura,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.0),
                enterprise: dec!(4.5),
            },
            entries: vec![
                entry_with(
                    "Arquitecto",
                    "Proyecto básico y de ejecución",
                    dec!(12000),
                    ProjectTypeOverrides {
                        residencial: Some(dec!(10000)),
                        industrial: Some(dec!(18000)),
                        comercial: Some(dec!(14000)),
                        rehabilitacion: Some(dec!(15000)),
                        ..Default::default()
                    },
                ),
                entry("Arquitecto técnico", "Dirección de ejecución", dec!(6000)),
                entry("Interiorista", "Proyecto de interiorismo", dec!(5000)),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Instalaciones,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.5),
                enterprise: dec!(6.0),
            },
            entries: vec![
                entry("Electricista", "Instalación eléctrica de vivienda", dec!(4500)),
                entry("Fontanero", "Fontanería completa", dec!(4000)),
                entry_with(
                    "Instalador",
                    "Instalación fotovoltaica",
                    dec!(7000),
                    ProjectTypeOverrides {
                        industrial: Some(dec!(25000)),
                        comercial: Some(dec!(12000)),
                        ..Default::default()
                    },
                ),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Software,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.5),
                enterprise: dec!(6.0),
            },
            entries: vec![
                entry("Desarrollador full-stack", "Web corporativa", dec!(6000)),
                entry("Desarrollador backend", "API a medida", dec!(14000)),
                entry("Desarrollador móvil", "App móvil", dec!(18000)),
                entry("Diseñador UX", "Diseño de producto", dec!(8000)),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Diseno,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.0),
                enterprise: dec!(4.0),
            },
            entries: vec![
                entry("Diseñador gráfico", "Identidad corporativa", dec!(2500)),
                entry("Diseñador web", "Diseño de sitio web", dec!(3000)),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Marketing,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.0),
                enterprise: dec!(4.0),
            },
            entries: vec![
                entry("Consultor de marketing", "Plan de marketing", dec!(5000)),
                entry("Community manager", "Gestión de redes (trimestre)", dec!(2400)),
            ],
        },
        SectorBenchmarks {
            sector: Sector::Consultoria,
            scale_factors: ScaleFactors {
                small: dec!(1.0),
                medium: dec!(2.0),
                enterprise: dec!(5.0),
            },
            entries: vec![
                entry("Consultor", "Diagnóstico", dec!(6000)),
                entry("Consultor senior", "Plan estratégico", dec!(15000)),
            ],
        },
    ]
}
