//! Trusted-source resolution for a topic.
//!
//! The answer service is asked for the most authoritative domains on the
//! topic. Its free-text answer is mined for domain-like tokens; if fewer
//! than `min_dynamic_domains` distinct domains come out, or the call
//! fails, the dynamic attempt is discarded and the static per-topic table
//! takes over (or an empty map, with `static_fallback` off).

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ScoringConfig;
use crate::domain::normalize_host;
use crate::service::AnswerService;
use crate::types::{Resolution, TrustedSourceMap};

/// `label(.label)*.tld` for the accepted TLDs. `co.uk` comes first so the
/// alternation prefers it over a bare `co` label.
const DOMAIN_PATTERN: &str = r"\b(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+(?:co\.uk|com|org|net|gov|edu|io)\b";

static DOMAIN_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn domain_regex() -> Option<&'static Regex> {
    DOMAIN_RE
        .get_or_init(|| Regex::new(DOMAIN_PATTERN).ok())
        .as_ref()
}

/// Build the source-generation prompt for `topic`.
pub fn sources_prompt(topic: &str) -> String {
    format!(
        "List the top 5 most authoritative website domains for the topic of '{topic}'. \
         Return only a comma-separated list."
    )
}

/// Extract distinct, canonical domains from free text, in first-seen order.
///
/// # Examples
///
/// ```
/// use veracity_core::sources::extract_domains;
///
/// let domains = extract_domains("Try www.NIH.gov, bbc.co.uk and nih.gov.");
/// assert_eq!(domains, vec!["nih.gov", "bbc.co.uk"]);
/// ```
pub fn extract_domains(text: &str) -> Vec<String> {
    let Some(re) = domain_regex() else {
        tracing::error!("domain pattern failed to compile");
        return Vec::new();
    };

    let lower = text.to_lowercase();
    let mut domains: Vec<String> = Vec::new();
    for found in re.find_iter(&lower) {
        let domain = normalize_host(found.as_str());
        if !domain.is_empty() && !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}

/// Ask the answer service for topic-specific authoritative domains.
///
/// Returns `None` if the call fails or yields too few domains.
pub async fn dynamic_sources<A: AnswerService>(
    answers: &A,
    topic: &str,
    config: &ScoringConfig,
) -> Option<TrustedSourceMap> {
    let answer = match answers.answer(&sources_prompt(topic)).await {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(topic, error = %err, "dynamic source generation failed");
            return None;
        }
    };

    tracing::trace!(topic, answer = %answer, "dynamic source answer");
    let domains = extract_domains(&answer);
    if domains.len() < config.min_dynamic_domains {
        tracing::warn!(
            topic,
            found = domains.len(),
            required = config.min_dynamic_domains,
            "too few domains in dynamic source answer"
        );
        return None;
    }

    Some(TrustedSourceMap::uniform(domains, config.dynamic_source_score))
}

/// Resolve the trusted-source map for `topic`.
///
/// The dynamic list wins when it validates. Otherwise the result is the
/// static table for the topic (`Default` table for unknown topics), or an
/// empty map when `config.static_fallback` is off.
pub async fn resolve_sources<A: AnswerService>(
    answers: &A,
    topic: &str,
    config: &ScoringConfig,
) -> Resolution<TrustedSourceMap> {
    if let Some(sources) = dynamic_sources(answers, topic, config).await {
        return Resolution::Computed(sources);
    }

    if config.static_fallback {
        tracing::warn!(topic, "falling back to static trusted sources");
        Resolution::Fallback(config.static_sources(topic))
    } else {
        Resolution::Fallback(TrustedSourceMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VeracityError;

    struct Scripted(Result<&'static str, ()>);

    impl AnswerService for Scripted {
        async fn answer(&self, _prompt: &str) -> Result<String, VeracityError> {
            self.0
                .map(str::to_owned)
                .map_err(|()| VeracityError::Http("timed out".into()))
        }
    }

    #[test]
    fn prompt_names_topic() {
        let prompt = sources_prompt("Health");
        assert!(prompt.contains("'Health'"));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn extracts_comma_separated_list() {
        let domains = extract_domains("mayoclinic.org, NIH.gov, cdc.gov, webmd.com, who.int");
        // who.int is not an accepted TLD
        assert_eq!(domains, vec!["mayoclinic.org", "nih.gov", "cdc.gov", "webmd.com"]);
    }

    #[test]
    fn extracts_from_prose_and_urls() {
        let domains = extract_domains(
            "The best sources are https://www.healthline.com/ and the journal at \
             jamanetwork.com; also see bbc.co.uk.",
        );
        assert_eq!(domains, vec!["healthline.com", "jamanetwork.com", "bbc.co.uk"]);
    }

    #[test]
    fn keeps_subdomains() {
        let domains = extract_domains("pubmed.ncbi.nlm.nih.gov and arxiv.org");
        assert_eq!(domains, vec!["pubmed.ncbi.nlm.nih.gov", "arxiv.org"]);
    }

    #[test]
    fn deduplicates_after_normalisation() {
        let domains = extract_domains("www.wired.com, wired.com, WIRED.COM");
        assert_eq!(domains, vec!["wired.com"]);
    }

    #[test]
    fn ignores_words_that_merely_contain_a_tld() {
        assert!(extract_domains("community organizations network").is_empty());
    }

    #[tokio::test]
    async fn valid_dynamic_answer_gets_uniform_score() {
        let config = ScoringConfig::default();
        let answers = Scripted(Ok("techcrunch.com, arstechnica.com, github.com"));
        let sources = resolve_sources(&answers, "Technology", &config).await;
        assert!(!sources.is_fallback());
        let sources = sources.into_inner();
        assert_eq!(sources.len(), 3);
        assert!(sources.iter().all(|(_, score)| score == 85));
    }

    #[tokio::test]
    async fn single_domain_falls_back_to_static_table() {
        let config = ScoringConfig::default();
        let answers = Scripted(Ok("I would recommend mayoclinic.org."));
        let sources = resolve_sources(&answers, "Health", &config).await;
        assert!(sources.is_fallback());
        assert_eq!(sources.value().get("mayoclinic.org"), Some(95));
    }

    #[tokio::test]
    async fn repeated_domain_counts_once() {
        let config = ScoringConfig::default();
        let answers = Scripted(Ok("mayoclinic.org, www.mayoclinic.org, MAYOCLINIC.ORG"));
        assert!(dynamic_sources(&answers, "Health", &config).await.is_none());

        let sources = resolve_sources(&answers, "Health", &config).await;
        assert!(sources.is_fallback());
        assert_eq!(sources.value().len(), 5);
        assert_eq!(sources.value().get("mayoclinic.org"), Some(95));
    }

    #[tokio::test]
    async fn failed_call_falls_back_to_static_health_table() {
        let config = ScoringConfig::default();
        let sources = resolve_sources(&Scripted(Err(())), "Health", &config).await;
        assert!(sources.is_fallback());
        let sources = sources.into_inner();
        assert!(!sources.is_empty());
        assert_eq!(sources.get("mayoclinic.org"), Some(95));
        assert_eq!(sources.get("cdc.gov"), Some(98));
    }

    #[tokio::test]
    async fn unknown_topic_falls_back_to_default_table() {
        let config = ScoringConfig::default();
        let sources = resolve_sources(&Scripted(Ok("no idea")), "Gardening", &config).await;
        assert_eq!(sources.value().get("apnews.com"), Some(80));
    }

    #[tokio::test]
    async fn without_static_fallback_failure_is_empty() {
        let config = ScoringConfig {
            static_fallback: false,
            ..Default::default()
        };
        let sources = resolve_sources(&Scripted(Err(())), "Health", &config).await;
        assert!(sources.is_fallback());
        assert!(sources.value().is_empty());
    }
}
