//! Project context and cost estimation engine.
//!
//! Turns a free-text project description, a sector and a client budget range
//! into a priced estimate, and refines it with similar historical quotes:
//!
//! - [`context`]: detects scale, urgency, location and price-volatility
//!   signals in the description
//! - [`catalog`]: static benchmark prices per sector, role and task
//! - [`estimation`]: combines range, catalog and context into a target and band
//! - [`history`]: embedding-based similarity over past quotes
//! - [`engine`]: runs all of the above for one quote request

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod embeddings;
pub mod engine;
pub mod error;
pub mod estimation;
pub mod history;
pub mod text;

pub use config::Config;
pub use engine::{QuoteEngine, QuotePreparation, QuoteRequest};
pub use error::{Error, Result};
