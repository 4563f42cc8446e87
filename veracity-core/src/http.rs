//! Shared HTTP client construction.
//!
//! Result pages are fetched with a browser-like User-Agent picked from a
//! rotation list; answer/search API calls identify themselves plainly.

use crate::error::VeracityError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Maximum redirects followed when fetching a result page.
const MAX_REDIRECTS: usize = 10;

/// Build a [`reqwest::Client`] for fetching result pages.
///
/// The client has:
/// - the given per-request timeout
/// - a random User-Agent from the rotation list
/// - at most [`MAX_REDIRECTS`] redirects
///
/// # Errors
///
/// Returns [`VeracityError::Http`] if the client cannot be constructed.
pub fn build_page_client(timeout_seconds: u64) -> Result<reqwest::Client, VeracityError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(random_user_agent())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| VeracityError::Http(format!("failed to build page client: {e}")))
}

/// Build a [`reqwest::Client`] for the answer/search API.
///
/// # Errors
///
/// Returns [`VeracityError::Http`] if the client cannot be constructed.
pub fn build_api_client(timeout_seconds: u64) -> Result<reqwest::Client, VeracityError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("veracity-core/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| VeracityError::Http(format!("failed to build API client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // SAFETY: USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_user_agent_returns_valid_ua() {
        let ua = random_user_agent();
        assert!(USER_AGENTS.contains(&ua));
        assert!(ua.contains("Mozilla/5.0"));
    }

    #[test]
    fn build_page_client_succeeds() {
        assert!(build_page_client(5).is_ok());
    }

    #[test]
    fn build_api_client_succeeds() {
        assert!(build_api_client(30).is_ok());
    }
}
