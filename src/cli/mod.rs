//! Command-line interface.
//!
//! Every command prints JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::catalog::BenchmarkCatalog;
use crate::config::Config;
use crate::context::{ContextAnalyzer, ProjectContext};
use crate::embeddings::EmbeddingStrategy;
use crate::engine::{QuoteEngine, QuoteRequest};
use crate::estimation::CostEstimator;
use crate::history::{JsonFileHistoryStore, QuoteHistoryMatcher};

#[derive(Parser, Debug)]
#[command(
    name = "presupuesto",
    version,
    about = "Project context analysis and cost estimation"
)]
pub struct Cli {
    /// Benchmark catalog JSON file replacing the built-in one
    #[arg(long, global = true, env = "PRESUPUESTO_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract scale, urgency, location and volatility signals
    Analyze {
        /// Free-text project description
        description: String,

        #[arg(long)]
        sector: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// JSON file with a previously derived context to merge with
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// Estimate a target price and range
    Estimate {
        /// Free-text project description
        description: String,

        #[arg(long)]
        sector: String,

        /// Client budget, e.g. "10 - 15" or "10.000 - 15.000 €"
        #[arg(long)]
        range: String,

        #[arg(long)]
        location: Option<String>,
    },

    /// Find similar past quotes in a JSON history file
    Similar {
        /// Free-text project description
        description: String,

        /// JSON array of historical quote records
        #[arg(long)]
        history: PathBuf,

        #[arg(long)]
        client: String,

        #[arg(long)]
        sector: Option<String>,

        /// Number of matches to keep (defaults to HISTORY_TOP_K)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Analyze, estimate and match history in one go
    Quote {
        /// Free-text project description
        description: String,

        #[arg(long)]
        sector: String,

        #[arg(long)]
        range: String,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        context: Option<PathBuf>,

        #[arg(long, requires = "client")]
        history: Option<PathBuf>,

        #[arg(long)]
        client: Option<String>,

        #[arg(long)]
        top_k: Option<usize>,
    },
}

/// Run a parsed command.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let compact = cli.compact;

    match cli.command {
        Command::Analyze {
            description,
            sector,
            location,
            context,
        } => {
            let existing = load_context(context.as_deref())?;
            let analyzed = ContextAnalyzer::new().analyze(
                &description,
                existing.as_ref(),
                location.as_deref(),
                sector.as_deref(),
            );
            print_json(&analyzed, compact)
        }
        Command::Estimate {
            description,
            sector,
            range,
            location,
        } => {
            let context = ContextAnalyzer::new().analyze(
                &description,
                None,
                location.as_deref(),
                Some(sector.as_str()),
            );
            let estimator = CostEstimator::with_catalog(catalog, config.estimator.clone());
            let estimate = estimator.estimate(&sector, &range, &context)?;
            print_json(&estimate, compact)
        }
        Command::Similar {
            description,
            history,
            client,
            sector,
            top_k,
        } => {
            let matcher = QuoteHistoryMatcher::new(
                Arc::new(JsonFileHistoryStore::new(history)),
                EmbeddingStrategy::from_config(&config.embedding),
            );
            let suggestion = matcher
                .suggest_price_from_history(
                    &client,
                    &description,
                    sector.as_deref(),
                    top_k.unwrap_or(config.history.top_k),
                )
                .await?;
            print_json(&suggestion, compact)
        }
        Command::Quote {
            description,
            sector,
            range,
            location,
            context,
            history,
            client,
            top_k,
        } => {
            let mut engine = QuoteEngine::new(catalog, &config);
            if let Some(path) = history {
                engine = engine.with_history(
                    Arc::new(JsonFileHistoryStore::new(path)),
                    EmbeddingStrategy::from_config(&config.embedding),
                );
            }
            let request = QuoteRequest {
                description,
                sector,
                price_range: range,
                location,
                existing_context: load_context(context.as_deref())?,
                client_key: client,
                top_k,
            };
            let prepared = engine.prepare_quote(&request).await?;
            print_json(&prepared, compact)
        }
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Arc<BenchmarkCatalog>> {
    let Some(path) = path else {
        return Ok(BenchmarkCatalog::seeded());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog = BenchmarkCatalog::from_json_str(&raw)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = catalog.len(), "Custom catalog loaded");
    Ok(Arc::new(catalog))
}

fn load_context(path: Option<&Path>) -> anyhow::Result<Option<ProjectContext>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading context {}", path.display()))?;
    let context = serde_json::from_str(&raw)
        .with_context(|| format!("parsing context {}", path.display()))?;
    Ok(Some(context))
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_quote_command() {
        let cli = Cli::try_parse_from([
            "presupuesto",
            "quote",
            "Reforma de baño",
            "--sector",
            "construccion",
            "--range",
            "5 - 8",
            "--history",
            "h.json",
            "--client",
            "acme",
            "--compact",
        ])
        .unwrap();
        assert!(cli.compact);
        match cli.command {
            Command::Quote { sector, client, .. } => {
                assert_eq!(sector, "construccion");
                assert_eq!(client.as_deref(), Some("acme"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_history_requires_client() {
        let result = Cli::try_parse_from([
            "presupuesto",
            "quote",
            "x",
            "--sector",
            "software",
            "--range",
            "1 - 2",
            "--history",
            "h.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_catalog_and_context_files() {
        assert!(!load_catalog(None).unwrap().is_empty());

        let mut catalog = tempfile::NamedTempFile::new().unwrap();
        write!(
            catalog,
            r#"[{{"sector": "software", "scale_factors": {{"small": "1", "medium": "2", "enterprise": "3"}},
                "entries": [{{"role": "Dev", "task": "Web", "average": "5000"}}]}}]"#
        )
        .unwrap();
        assert_eq!(load_catalog(Some(catalog.path())).unwrap().len(), 1);

        let mut context = tempfile::NamedTempFile::new().unwrap();
        write!(context, r#"{{"scaleOverride": "medium"}}"#).unwrap();
        let loaded = load_context(Some(context.path())).unwrap().unwrap();
        assert_eq!(loaded.scale_override(), Some(crate::context::ScaleTier::Medium));

        assert!(load_catalog(Some(Path::new("/nonexistent/catalog.json"))).is_err());
    }
}
