//! Scoring and client configuration with sensible defaults.
//!
//! [`ScoringConfig`] carries every constant the pipeline uses: weights,
//! bonuses, limits, the static per-topic fallback table and the reputable
//! citation list. It is built once and shared read-only, so alternate
//! weight sets can be tested without touching global state.
//! [`ExaConfig`] controls how the answer/search service is reached.

use crate::error::VeracityError;
use crate::types::{TrustedSourceMap, DEFAULT_TOPIC};

/// Hand-curated per-topic trusted sources, used when dynamic generation fails.
const STATIC_TOPIC_SOURCES: &[(&str, &[(&str, u32)])] = &[
    (
        "Health",
        &[
            ("mayoclinic.org", 95),
            ("webmd.com", 80),
            ("healthline.com", 85),
            ("nih.gov", 98),
            ("cdc.gov", 98),
        ],
    ),
    (
        "Technology",
        &[
            ("techcrunch.com", 85),
            ("wired.com", 80),
            ("theverge.com", 85),
            ("stackoverflow.com", 90),
            ("github.com", 80),
        ],
    ),
    (
        "Finance",
        &[
            ("bloomberg.com", 90),
            ("wsj.com", 90),
            ("reuters.com", 85),
            ("forbes.com", 75),
        ],
    ),
    (
        DEFAULT_TOPIC,
        &[("wikipedia.org", 70), ("reuters.com", 80), ("apnews.com", 80)],
    ),
];

/// Topic-independent domains whose outbound links count as citations.
const REPUTABLE_CITATIONS: &[&str] = &[
    // journals
    "nature.com",
    "sciencemag.org",
    "thelancet.com",
    "nejm.org",
    // news agencies
    "reuters.com",
    "apnews.com",
    "bbc.com",
    // health bodies
    "nih.gov",
    "cdc.gov",
    "who.int",
];

/// Topics accepted when `strict_topics` is enabled.
const ALLOWED_TOPICS: &[&str] = &["Health", "Technology", "Finance"];

/// Configuration for the veracity scoring pipeline.
///
/// Use [`Default::default()`] for the production values, or construct
/// with field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Weight of the authority score, in whole percent.
    pub authority_weight: u32,
    /// Weight of the normalised citation score, in whole percent.
    pub citation_weight: u32,
    /// Authority for `.gov`/`.edu` hosts not in the trusted map.
    pub institutional_bonus: u32,
    /// Authority for any other host not in the trusted map.
    pub baseline_authority: u32,
    /// Uniform authority assigned to dynamically generated sources.
    pub dynamic_source_score: u32,
    /// Fewest distinct domains a dynamic source list must yield.
    pub min_dynamic_domains: usize,
    /// Upper bound on the citation count.
    pub max_citations: u32,
    /// Multiplier mapping the citation count onto 0–100.
    pub citation_scale: u32,
    /// Number of results requested from the search service.
    pub num_results: usize,
    /// Timeout for each result page fetch, in seconds.
    pub fetch_timeout_seconds: u64,
    /// Reject queries whose topic is not in `allowed_topics`.
    pub strict_topics: bool,
    /// Topics accepted in strict mode.
    pub allowed_topics: Vec<String>,
    /// Fall back to `topic_sources` when dynamic generation fails.
    pub static_fallback: bool,
    /// Static per-topic trusted sources. Must contain a `Default` entry.
    pub topic_sources: Vec<(String, TrustedSourceMap)>,
    /// Reputable citation domains.
    pub citation_list: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            authority_weight: 70,
            citation_weight: 30,
            institutional_bonus: 75,
            baseline_authority: 50,
            dynamic_source_score: 85,
            min_dynamic_domains: 2,
            max_citations: 10,
            citation_scale: 10,
            num_results: 5,
            fetch_timeout_seconds: 5,
            strict_topics: false,
            allowed_topics: ALLOWED_TOPICS.iter().map(|t| (*t).to_owned()).collect(),
            static_fallback: true,
            topic_sources: STATIC_TOPIC_SOURCES
                .iter()
                .map(|(topic, sources)| {
                    (
                        (*topic).to_owned(),
                        sources.iter().map(|(d, s)| (*d, *s)).collect(),
                    )
                })
                .collect(),
            citation_list: REPUTABLE_CITATIONS.iter().map(|d| (*d).to_owned()).collect(),
        }
    }
}

impl ScoringConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `authority_weight + citation_weight` must equal 100
    /// - `num_results` must be greater than 0
    /// - `fetch_timeout_seconds` must be greater than 0
    /// - `min_dynamic_domains` must be greater than 0
    /// - `topic_sources` must contain a `Default` entry
    pub fn validate(&self) -> Result<(), VeracityError> {
        if self
            .authority_weight
            .checked_add(self.citation_weight)
            != Some(100)
        {
            return Err(VeracityError::Config(
                "authority_weight + citation_weight must equal 100".into(),
            ));
        }
        if self.num_results == 0 {
            return Err(VeracityError::Config(
                "num_results must be greater than 0".into(),
            ));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(VeracityError::Config(
                "fetch_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.min_dynamic_domains == 0 {
            return Err(VeracityError::Config(
                "min_dynamic_domains must be greater than 0".into(),
            ));
        }
        if !self
            .topic_sources
            .iter()
            .any(|(topic, _)| topic == DEFAULT_TOPIC)
        {
            return Err(VeracityError::Config(
                "topic_sources must contain a Default entry".into(),
            ));
        }
        Ok(())
    }

    /// Static trusted sources for `topic`, or the `Default` table when the
    /// topic has no dedicated entry. Topic comparison ignores ASCII case.
    pub fn static_sources(&self, topic: &str) -> TrustedSourceMap {
        self.topic_sources
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(topic))
            .or_else(|| self.topic_sources.iter().find(|(t, _)| t == DEFAULT_TOPIC))
            .map(|(_, sources)| sources.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if `topic` is in the strict-mode allow-list.
    pub fn is_allowed_topic(&self, topic: &str) -> bool {
        self.allowed_topics.iter().any(|t| t == topic)
    }
}

/// Connection settings for the Exa answer/search service.
#[derive(Clone)]
pub struct ExaConfig {
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Base URL (defaults to `https://api.exa.ai`).
    pub base_url: String,
    /// Request timeout in seconds for answer and search calls.
    pub timeout_seconds: u64,
}

impl ExaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.exa.ai".into(),
            timeout_seconds: 30,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ExaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExaConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
