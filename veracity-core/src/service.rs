//! Trait definitions for the external collaborators of the pipeline.
//!
//! The pipeline never talks to the network directly; it goes through
//! these three seams so that the answer service, the search service and
//! page fetching can each be replaced (by [`crate::exa::ExaClient`],
//! [`crate::fetch::HttpPageFetcher`], or an in-memory double in tests).
//!
//! All implementations must be `Send + Sync` so one pipeline can serve
//! concurrent requests.

use std::future::Future;

use crate::error::VeracityError;
use crate::types::SearchResult;

/// A free-text question/answer service.
pub trait AnswerService: Send + Sync {
    /// Ask `prompt` and return the service's answer text.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError`] on transport failure, non-2xx status or
    /// an unparseable response body.
    fn answer(&self, prompt: &str) -> impl Future<Output = Result<String, VeracityError>> + Send;
}

/// A web search service returning candidate result URLs.
pub trait SearchService: Send + Sync {
    /// Search for `query`, requesting `num_results` results.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError`] if the request fails or the response
    /// cannot be parsed.
    fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, VeracityError>> + Send;
}

/// Fetches the raw HTML of a result page.
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError::Http`] on any fetch failure, including
    /// timeouts and non-2xx statuses.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, VeracityError>> + Send;
}
