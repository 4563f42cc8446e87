//! Error types for the veracity-core crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or sensitive data appear in
//! error messages.

/// Errors that can occur while scoring search results.
///
/// Only [`VeracityError::MissingQuery`], [`VeracityError::UnsupportedTopic`]
/// and [`VeracityError::Search`] ever escape the pipeline. Failures of the
/// answer service or of result page fetches are recovered locally with a
/// fallback value.
#[derive(Debug, thiserror::Error)]
pub enum VeracityError {
    /// The caller did not supply a (non-blank) query.
    #[error("Query not provided")]
    MissingQuery,

    /// Strict topic mode is on and the detected topic is not allowed.
    #[error("unsupported topic '{detected}'; supported topics: {}", supported.join(", "))]
    UnsupportedTopic {
        /// The topic label the classifier produced.
        detected: String,
        /// The topics accepted in strict mode.
        supported: Vec<String>,
    },

    /// An HTTP request to an external service failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse an external service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The search service call failed. There is no fallback for this.
    #[error("search failed: {0}")]
    Search(String),

    /// Invalid scoring or client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl VeracityError {
    /// Returns `true` for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingQuery | Self::UnsupportedTopic { .. })
    }
}

/// Convenience type alias for veracity-core results.
pub type Result<T> = std::result::Result<T, VeracityError>;
