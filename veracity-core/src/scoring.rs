//! Final veracity scoring and trust bands.
//!
//! Formula:
//!
//! ```text
//! normalized = min(citations, max_citations) * citation_scale
//! score      = floor((authority * authority_weight + normalized * citation_weight) / 100)
//! ```
//!
//! Weights are whole percentages, so the truncation is exact integer
//! division with no floating-point drift.

use std::fmt;

use crate::config::ScoringConfig;

/// Combine an authority score (0–100) and a citation count into a
/// veracity score (0–100).
///
/// Inputs above their ranges are clamped first.
///
/// # Examples
///
/// ```
/// use veracity_core::{scoring::veracity_score, ScoringConfig};
///
/// let config = ScoringConfig::default();
/// assert_eq!(veracity_score(95, 3, &config), 75);
/// assert_eq!(veracity_score(50, 5, &config), 50);
/// ```
pub fn veracity_score(authority: u32, citations: u32, config: &ScoringConfig) -> u32 {
    let authority = authority.min(100);
    let normalized = citations
        .min(config.max_citations)
        .saturating_mul(config.citation_scale)
        .min(100);
    let weighted = authority
        .saturating_mul(config.authority_weight)
        .saturating_add(normalized.saturating_mul(config.citation_weight));
    (weighted / 100).min(100)
}

/// Coarse credibility band of a veracity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustLevel {
    /// 75 and above.
    High,
    /// 50 to 74.
    Medium,
    /// Below 50.
    Low,
}

impl TrustLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            75.. => Self::High,
            50..=74 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Human-readable credibility label for a veracity score.
pub fn trust_description(score: u32) -> &'static str {
    match score {
        85.. => "Highly Credible",
        75..=84 => "Credible",
        60..=74 => "Moderately Credible",
        45..=59 => "Limited Credibility",
        _ => "Low Credibility",
    }
}
