//! Error types for the estimation engine.

/// Errors raised while turning a price range and context into an estimate.
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    /// The price range could not be read or is inverted.
    #[error("Invalid price range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },
}

/// Errors raised while loading or validating a benchmark catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid benchmark entry {sector}/{role}/{task}: {reason}")]
    InvalidEntry {
        sector: String,
        role: String,
        task: String,
        reason: String,
    },

    #[error("Duplicate benchmark entry {sector}/{role}/{task}")]
    DuplicateEntry {
        sector: String,
        role: String,
        task: String,
    },

    #[error("Invalid scale factors for sector {sector}: {reason}")]
    InvalidScaleFactors { sector: String, reason: String },
}

/// Errors raised by the historical quote store.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The backing store could not be read.
    #[error("History store unavailable: {reason}")]
    Store { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode history records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key} ({hint})")]
    MissingRequired { key: String, hint: String },
}

/// Top-level error for the engine façade.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
