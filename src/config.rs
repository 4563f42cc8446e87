//! Configuration for the veracity service.
//!
//! Settings come from an optional TOML file (path in `VERACITY_CONFIG`);
//! every field has a default, so an absent file or a partial one is fine.
//! The answer/search API key is never read from the file: it comes from
//! the `EXA_API_KEY` environment variable only and is never serialized.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use veracity_core::{ExaConfig, ScoringConfig};

use crate::error::{Result, ServiceError};

/// Environment variable holding the answer/search API key.
pub const API_KEY_ENV: &str = "EXA_API_KEY";

/// Environment variable holding the optional config file path.
pub const CONFIG_PATH_ENV: &str = "VERACITY_CONFIG";

/// Service configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to (`0` for auto-assign).
    pub port: u16,
    /// Answer/search service base URL override.
    pub exa_base_url: Option<String>,
    /// Timeout for answer/search calls, in seconds.
    pub exa_timeout_seconds: u64,
    /// Reject queries whose topic is not Health, Technology or Finance.
    pub strict_topics: bool,
    /// Fall back to the static per-topic tables when dynamic sources fail.
    pub static_fallback: bool,
    /// Number of search results to score per query.
    pub num_results: usize,
    /// Timeout for each result page fetch, in seconds.
    pub fetch_timeout_seconds: u64,
    /// Answer/search API key, from the environment only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
            exa_base_url: None,
            exa_timeout_seconds: 30,
            strict_topics: scoring.strict_topics,
            static_fallback: scoring.static_fallback,
            num_results: scoring.num_results,
            fetch_timeout_seconds: scoring.fetch_timeout_seconds,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("exa_base_url", &self.exa_base_url)
            .field("exa_timeout_seconds", &self.exa_timeout_seconds)
            .field("strict_topics", &self.strict_topics)
            .field("static_fallback", &self.static_fallback)
            .field("num_results", &self.num_results)
            .field("fetch_timeout_seconds", &self.fetch_timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Load configuration from the environment.
    ///
    /// Reads the file named by `VERACITY_CONFIG` if set, otherwise uses
    /// defaults, then picks up the API key from `EXA_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file cannot be read or parsed.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(&PathBuf::from(path))?,
            None => Self::default(),
        };
        config.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Ok(config)
    }

    /// Scoring configuration derived from these settings.
    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            strict_topics: self.strict_topics,
            static_fallback: self.static_fallback,
            num_results: self.num_results,
            fetch_timeout_seconds: self.fetch_timeout_seconds,
            ..ScoringConfig::default()
        }
    }

    /// Answer/search client configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] if no API key is set.
    pub fn exa_config(&self) -> Result<ExaConfig> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut exa = ExaConfig::new(key).with_timeout_seconds(self.exa_timeout_seconds);
        if let Some(ref base_url) = self.exa_base_url {
            exa = exa.with_base_url(base_url.as_str());
        }
        Ok(exa)
    }

    /// `host:port` string to bind to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
