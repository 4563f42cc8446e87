//! Exa API client: the answer service and the search service.
//!
//! Both endpoints take a JSON `POST` with the API key in an `x-api-key`
//! header:
//!
//! - `POST {base}/answer` with `{"query": prompt}` → `{"answer": "..."}`
//! - `POST {base}/search` with `{"query", "numResults"}` → `{"results": [...]}`

use serde::{Deserialize, Serialize};

use crate::config::ExaConfig;
use crate::error::VeracityError;
use crate::http;
use crate::service::{AnswerService, SearchService};
use crate::types::SearchResult;

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Client for the Exa answer and search endpoints.
#[derive(Debug, Clone)]
pub struct ExaClient {
    config: ExaConfig,
    client: reqwest::Client,
}

impl ExaClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ExaConfig) -> Result<Self, VeracityError> {
        let client = http::build_api_client(config.timeout_seconds)?;
        Ok(Self { config, client })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, VeracityError> {
        let url = format!("{}/{endpoint}", self.config.base_url);
        self.client
            .post(&url)
            .header("accept", "application/json")
            .header("x-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| VeracityError::Http(format!("{endpoint} request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VeracityError::Http(format!("{endpoint} HTTP error: {e}")))
    }
}

impl AnswerService for ExaClient {
    async fn answer(&self, prompt: &str) -> Result<String, VeracityError> {
        let response = self.post("answer", &AnswerRequest { query: prompt }).await?;
        let body: AnswerResponse = response
            .json()
            .await
            .map_err(|e| VeracityError::Parse(format!("answer response: {e}")))?;
        tracing::trace!(answer = %body.answer, "answer received");
        Ok(body.answer)
    }
}

impl SearchService for ExaClient {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, VeracityError> {
        let request = SearchRequest { query, num_results };
        let response = self
            .post("search", &request)
            .await
            .map_err(|e| match e {
                VeracityError::Http(message) => VeracityError::Search(message),
                other => other,
            })?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| VeracityError::Search(format!("unparseable search response: {e}")))?;
        tracing::debug!(count = body.results.len(), "search results received");
        Ok(body.results)
    }
}
