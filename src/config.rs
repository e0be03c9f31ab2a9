//! Configuration loaded from environment variables.
//!
//! Call `dotenvy::dotenv()` before [`Config::from_env`] to pick up a `.env`
//! file. Every setting has a default except the API key, which is only
//! required when the remote embedding provider is selected.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;

use crate::context::ScaleTier;
use crate::error::ConfigError;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_millis(2500);
pub const DEFAULT_TOP_K: usize = 5;

/// Which embedding backend to call for history matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProviderKind {
    /// Deterministic local term vectors only.
    #[default]
    Local,
    /// OpenAI-compatible `/embeddings` endpoint, with local fallback.
    OpenAi,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "none" | "" => Ok(Self::Local),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!(
                "unknown embedding provider '{}', expected 'local' or 'openai'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    /// Budget for one remote embedding call before falling back.
    pub timeout: Duration,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Local,
            api_key: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_EMBEDDING_BASE_URL.to_string(),
            timeout: DEFAULT_EMBEDDING_TIMEOUT,
        }
    }
}

/// Knobs for the cost estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    /// Tier used when the context carries no scale override.
    pub default_tier: ScaleTier,
    /// The catalog replaces the range midpoint only when its value lies in
    /// `[low / ratio, high * ratio]`.
    pub catalog_override_ratio: Decimal,
    pub low_margin: Decimal,
    pub high_margin: Decimal,
    /// Absolute minimum for every amount in an estimate.
    pub floor: Decimal,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_tier: ScaleTier::Small,
            catalog_override_ratio: dec!(3.0),
            low_margin: dec!(0.10),
            high_margin: dec!(0.15),
            floor: dec!(100),
        }
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_override_ratio < Decimal::ONE {
            return Err(invalid(
                "ESTIMATE_CATALOG_OVERRIDE_RATIO",
                "must be at least 1.0",
            ));
        }
        if self.low_margin < Decimal::ZERO || self.low_margin >= Decimal::ONE {
            return Err(invalid("ESTIMATE_LOW_MARGIN", "must be in [0, 1)"));
        }
        if self.high_margin < Decimal::ZERO {
            return Err(invalid("ESTIMATE_HIGH_MARGIN", "must not be negative"));
        }
        if self.floor <= Decimal::ZERO {
            return Err(invalid("ESTIMATE_FLOOR", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Number of similar quotes returned by default.
    pub top_k: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub estimator: EstimatorConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider: EmbeddingProviderKind =
            parse_or(&get, "EMBEDDING_PROVIDER", EmbeddingProviderKind::Local)?;
        let api_key = get("OPENAI_API_KEY").map(SecretString::from);
        if provider == EmbeddingProviderKind::OpenAi && api_key.is_none() {
            return Err(ConfigError::MissingRequired {
                key: "OPENAI_API_KEY".to_string(),
                hint: "set it or use EMBEDDING_PROVIDER=local".to_string(),
            });
        }

        let timeout_ms: u64 = parse_or(
            &get,
            "EMBEDDING_TIMEOUT_MS",
            DEFAULT_EMBEDDING_TIMEOUT.as_millis() as u64,
        )?;
        if timeout_ms == 0 {
            return Err(invalid("EMBEDDING_TIMEOUT_MS", "must be positive"));
        }

        let embedding = EmbeddingConfig {
            provider,
            api_key,
            model: get("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            base_url: get("EMBEDDING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_BASE_URL.to_string()),
            timeout: Duration::from_millis(timeout_ms),
        };

        let defaults = EstimatorConfig::default();
        let estimator = EstimatorConfig {
            default_tier: parse_or(&get, "ESTIMATE_DEFAULT_TIER", defaults.default_tier)?,
            catalog_override_ratio: parse_or(
                &get,
                "ESTIMATE_CATALOG_OVERRIDE_RATIO",
                defaults.catalog_override_ratio,
            )?,
            low_margin: parse_or(&get, "ESTIMATE_LOW_MARGIN", defaults.low_margin)?,
            high_margin: parse_or(&get, "ESTIMATE_HIGH_MARGIN", defaults.high_margin)?,
            floor: parse_or(&get, "ESTIMATE_FLOOR", defaults.floor)?,
        };
        estimator.validate()?;

        let history = HistoryConfig {
            top_k: parse_or(&get, "HISTORY_TOP_K", DEFAULT_TOP_K)?,
        };

        Ok(Self {
            embedding,
            estimator,
            history,
        })
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}
