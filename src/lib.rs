//! Veracity: scores web search results for trustworthiness.
//!
//! This crate is the service shell around [`veracity_core`]: it loads
//! configuration, wires the scoring pipeline to the Exa answer/search API,
//! and serves it over HTTP.
//!
//! # Architecture
//!
//! - **Config**: TOML file plus `EXA_API_KEY` from the environment
//! - **Pipeline**: topic → trusted sources → biased search → per-result
//!   authority and citation scoring (see [`veracity_core::orchestrator`])
//! - **Server**: `GET /search?q=` returns the annotated results as JSON

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::{Result, ServiceError};
pub use server::VeracityServer;

use std::sync::Arc;
use veracity_core::ExaPipeline;

/// Build the production pipeline described by `config`.
///
/// # Errors
///
/// Returns [`ServiceError::Config`] if no API key is set, or a scoring
/// error if the pipeline configuration is invalid.
pub fn build_pipeline(config: &ServerConfig) -> Result<Arc<ExaPipeline>> {
    let pipeline = ExaPipeline::from_exa(config.exa_config()?, config.scoring_config())?;
    Ok(Arc::new(pipeline))
}
