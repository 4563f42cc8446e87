//! Core types: search results, trusted-source maps and resolution outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Topic label used when classification fails or yields nothing usable.
pub const DEFAULT_TOPIC: &str = "Default";

/// A single result returned by the search service.
///
/// Only `url` is interpreted; every other field the service returns is
/// carried through untouched in `extra` and serialized back at the top
/// level. The pipeline fills `veracity_score` and `topic` exactly once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The URL of the result page. Missing or empty URLs score 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Final 0–100 veracity score.
    #[serde(
        rename = "veracityScore",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub veracity_score: Option<u32>,
    /// Topic the query was classified under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// All other fields of the service's result object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// Creates a result carrying only a URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// The result URL, or `""` when absent.
    pub fn url_str(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    /// Attaches the pipeline's annotations.
    pub fn annotate(&mut self, veracity_score: u32, topic: &str) {
        self.veracity_score = Some(veracity_score);
        self.topic = Some(topic.to_owned());
    }
}

/// Topic-specific mapping of domain → authority score.
///
/// Keys are lower-cased and `www.`-stripped. Iteration follows insertion
/// order, which is also the first-match order used by authority scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedSourceMap {
    entries: Vec<(String, u32)>,
}

impl TrustedSourceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map that assigns the same score to every domain.
    pub fn uniform<I, S>(domains: I, score: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        domains.into_iter().map(|d| (d.into(), score)).collect()
    }

    /// Inserts a domain, normalising the key. An existing entry keeps its
    /// position and takes the new score.
    pub fn insert(&mut self, domain: impl Into<String>, score: u32) {
        let key = crate::domain::normalize_host(&domain.into());
        if key.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(d, _)| *d == key) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((key, score)),
        }
    }

    /// Returns the score for an exact (normalised) domain key.
    pub fn get(&self, domain: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, score)| *score)
    }

    /// Iterates `(domain, score)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(d, s)| (d.as_str(), *s))
    }

    /// Iterates domain keys in insertion order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(d, _)| d.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for TrustedSourceMap {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (domain, score) in iter {
            map.insert(domain, score);
        }
        map
    }
}

/// Outcome of a step that may fall back to a default value.
///
/// Both variants carry a usable value; the tag only records whether the
/// value was genuinely computed or substituted after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The external call succeeded and produced this value.
    Computed(T),
    /// The external call failed (or returned garbage); this is the default.
    Fallback(T),
}

impl<T> Resolution<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Computed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Computed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}
