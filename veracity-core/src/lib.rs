//! # veracity-core
//!
//! Veracity scoring for web search results.
//!
//! Each result of a search is given a 0–100 veracity score that blends two
//! signals: how authoritative the result's domain is for the query's topic,
//! and how many of the page's outbound links point at independently
//! reputable domains.
//!
//! ## Design
//!
//! - The query is classified into a topic by an external answer service;
//!   classification failure falls back to the `Default` topic
//! - Topic-specific trusted domains are generated dynamically, with a
//!   hand-curated static table as the safety net
//! - The search query is biased towards the trusted domains with `site:`
//!   filters
//! - Each result page is fetched once and its outbound links are matched
//!   against a fixed reputable-citation list
//! - `score = floor(0.7 * authority + 0.3 * 10 * citations)`
//!
//! ## Failure model
//!
//! Failures of the answer service and of page fetches never abort a query;
//! each is replaced by a deterministic fallback and tagged as such in
//! [`Resolution`]. Only a failed search call is returned as an error.

pub mod citations;
pub mod config;
pub mod domain;
pub mod error;
pub mod exa;
pub mod fetch;
pub mod http;
pub mod orchestrator;
pub mod scoring;
pub mod service;
pub mod sources;
pub mod topic;
pub mod types;

pub use config::{ExaConfig, ScoringConfig};
pub use error::{Result, VeracityError};
pub use exa::ExaClient;
pub use fetch::HttpPageFetcher;
pub use orchestrator::{ExaPipeline, ScoringReport, VeracityPipeline};
pub use service::{AnswerService, PageFetcher, SearchService};
pub use types::{Resolution, SearchResult, TrustedSourceMap, DEFAULT_TOPIC};

/// Score the results of `query` using the Exa API.
///
/// Convenience wrapper that builds an [`ExaPipeline`] for a single query.
/// Long-running callers should build the pipeline once and reuse it.
///
/// # Errors
///
/// Returns [`VeracityError::MissingQuery`] for a blank query,
/// [`VeracityError::UnsupportedTopic`] in strict mode, and
/// [`VeracityError::Search`] if the search call fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> veracity_core::Result<()> {
/// let exa = veracity_core::ExaConfig::new("exa-api-key");
/// let results = veracity_core::score_query("best treatment for migraines", exa).await?;
/// for result in &results {
///     println!("{}: {:?}", result.url_str(), result.veracity_score);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn score_query(query: &str, exa: ExaConfig) -> Result<Vec<SearchResult>> {
    ExaPipeline::from_exa(exa, ScoringConfig::default())?
        .run(query)
        .await
}
