//! Static region table used for location multipliers.

/// A market region and the aliases that identify it in normalized text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Cost-of-market multiplier, never below 1.0.
    pub multiplier: f64,
}

pub const REGIONS: &[Region] = &[
    Region {
        name: "Madrid",
        aliases: &["madrid", "alcobendas", "pozuelo", "majadahonda", "las rozas"],
        multiplier: 1.15,
    },
    Region {
        name: "Barcelona",
        aliases: &["barcelona", "sant cugat", "castelldefels", "badalona"],
        multiplier: 1.15,
    },
    Region {
        name: "San Sebastián",
        aliases: &["san sebastian", "donostia", "gipuzkoa", "guipuzcoa"],
        multiplier: 1.12,
    },
    Region {
        name: "Islas Baleares",
        aliases: &["baleares", "mallorca", "ibiza", "menorca", "palma de mallorca"],
        multiplier: 1.12,
    },
    Region {
        name: "Bilbao",
        aliases: &["bilbao", "bizkaia", "vizcaya", "getxo"],
        multiplier: 1.10,
    },
    Region {
        name: "Marbella",
        aliases: &["marbella", "estepona", "sotogrande"],
        multiplier: 1.10,
    },
    Region {
        name: "Valencia",
        aliases: &["valencia"],
        multiplier: 1.05,
    },
    Region {
        name: "Málaga",
        aliases: &["malaga"],
        multiplier: 1.05,
    },
    Region {
        name: "Sevilla",
        aliases: &["sevilla"],
        multiplier: 1.03,
    },
    Region {
        name: "Zaragoza",
        aliases: &["zaragoza"],
        multiplier: 1.02,
    },
];

/// Highest-multiplier region mentioned in already-normalized `text`.
pub fn best_region(text: &str) -> Option<&'static Region> {
    REGIONS
        .iter()
        .filter(|region| region.aliases.iter().any(|alias| text.contains(alias)))
        .max_by(|a, b| a.multiplier.total_cmp(&b.multiplier))
}
