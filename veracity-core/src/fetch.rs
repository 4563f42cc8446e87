//! Result page fetching over HTTP.

use crate::error::VeracityError;
use crate::http;
use crate::service::PageFetcher;

/// [`PageFetcher`] backed by a reqwest client with a short timeout.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Create a fetcher whose requests time out after `timeout_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_seconds: u64) -> Result<Self, VeracityError> {
        Ok(Self {
            client: http::build_page_client(timeout_seconds)?,
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, VeracityError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| VeracityError::Http(format!("page request failed: {e}")))?
            .error_for_status()
            .map_err(|e| VeracityError::Http(format!("page HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| VeracityError::Http(format!("page read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "page received");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_page_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(5).expect("fetcher");
        let body = fetcher
            .fetch(&format!("{}/article", server.uri()))
            .await
            .expect("fetch");
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn not_found_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(5).expect("fetcher");
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;
        assert!(matches!(result, Err(VeracityError::Http(_))));
    }

    #[tokio::test]
    async fn slow_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let fetcher = HttpPageFetcher::new(1).expect("fetcher");
        let result = fetcher.fetch(&server.uri()).await;
        assert!(result.is_err());
    }
}
