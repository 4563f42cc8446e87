//! Per-query scoring pipeline.
//!
//! # Pipeline
//!
//! 1. Reject a missing or blank query
//! 2. Classify the query into a topic (strict mode rejects unlisted topics)
//! 3. Resolve trusted sources for the topic
//! 4. Bias the query with `site:` filters for every trusted domain
//! 5. Search, requesting `num_results` results
//! 6. For each result: authority + citations → veracity score, annotate
//!
//! Every external call is made in sequence; page fetches happen one
//! result at a time. Only a failure of the search call itself is
//! returned as an error.

use std::sync::Arc;

use crate::citations::citation_score;
use crate::config::{ExaConfig, ScoringConfig};
use crate::domain::authority;
use crate::error::{Result, VeracityError};
use crate::exa::ExaClient;
use crate::fetch::HttpPageFetcher;
use crate::scoring::{trust_description, veracity_score, TrustLevel};
use crate::service::{AnswerService, PageFetcher, SearchService};
use crate::sources::resolve_sources;
use crate::topic::resolve_topic;
use crate::types::{Resolution, SearchResult, TrustedSourceMap};

/// Pipeline wired to the Exa API and plain HTTP page fetches.
pub type ExaPipeline = VeracityPipeline<ExaClient, ExaClient, HttpPageFetcher>;

/// Everything a scoring pass decided, including which steps fell back.
#[derive(Debug, Clone)]
pub struct ScoringReport {
    /// Topic the query was classified under.
    pub topic: Resolution<String>,
    /// Trusted sources used for authority scoring and query biasing.
    pub sources: Resolution<TrustedSourceMap>,
    /// The query string actually sent to the search service.
    pub final_query: String,
    /// Annotated results, in search-service order.
    pub results: Vec<SearchResult>,
    /// Number of results whose page could not be fetched.
    pub citation_fallbacks: usize,
}

/// Append an OR-combination of `site:` filters for every trusted domain.
///
/// The query is returned unchanged when `sources` is empty.
///
/// # Examples
///
/// ```
/// use veracity_core::orchestrator::biased_query;
/// use veracity_core::TrustedSourceMap;
///
/// let sources = TrustedSourceMap::uniform(["nih.gov", "cdc.gov"], 85);
/// assert_eq!(
///     biased_query("flu shots", &sources),
///     "flu shots (site:nih.gov OR site:cdc.gov)"
/// );
/// ```
pub fn biased_query(query: &str, sources: &TrustedSourceMap) -> String {
    if sources.is_empty() {
        return query.to_owned();
    }
    let filters = sources
        .domains()
        .map(|domain| format!("site:{domain}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("{query} ({filters})")
}

/// Veracity scoring pipeline over pluggable external services.
///
/// Holds no per-request state; one instance can serve any number of
/// queries concurrently.
#[derive(Debug)]
pub struct VeracityPipeline<A, S, F> {
    answers: A,
    search: S,
    fetcher: F,
    config: Arc<ScoringConfig>,
}

impl ExaPipeline {
    /// Build a pipeline that talks to Exa and fetches pages over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError::Config`] if `config` is invalid, or
    /// [`VeracityError::Http`] if an HTTP client cannot be built.
    pub fn from_exa(exa: ExaConfig, config: ScoringConfig) -> Result<Self> {
        let client = ExaClient::new(exa)?;
        let fetcher = HttpPageFetcher::new(config.fetch_timeout_seconds)?;
        Self::new(client.clone(), client, fetcher, config)
    }
}

impl<A, S, F> VeracityPipeline<A, S, F>
where
    A: AnswerService,
    S: SearchService,
    F: PageFetcher,
{
    /// Assemble a pipeline from its services.
    ///
    /// # Errors
    ///
    /// Returns [`VeracityError::Config`] if `config` fails validation.
    pub fn new(answers: A, search: S, fetcher: F, config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            answers,
            search,
            fetcher,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score the results of `query`, returning the annotated list.
    ///
    /// # Errors
    ///
    /// - [`VeracityError::MissingQuery`] for a blank query (no external call is made)
    /// - [`VeracityError::UnsupportedTopic`] in strict mode for unlisted topics
    /// - [`VeracityError::Search`] if the search call fails
    pub async fn run(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.run_detailed(query).await.map(|report| report.results)
    }

    /// Like [`run`](Self::run), but also reports what each step resolved to.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_detailed(&self, query: &str) -> Result<ScoringReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(VeracityError::MissingQuery);
        }
        let config = self.config.as_ref();

        // 1. Topic.
        let allowed = config
            .strict_topics
            .then_some(config.allowed_topics.as_slice());
        let topic = resolve_topic(&self.answers, query, allowed).await;
        tracing::debug!(topic = %topic.value(), fallback = topic.is_fallback(), "detected topic");

        if config.strict_topics && !config.is_allowed_topic(topic.value()) {
            return Err(VeracityError::UnsupportedTopic {
                detected: topic.into_inner(),
                supported: config.allowed_topics.clone(),
            });
        }

        // 2. Trusted sources.
        let sources = resolve_sources(&self.answers, topic.value(), config).await;
        tracing::debug!(
            sources = ?sources.value(),
            fallback = sources.is_fallback(),
            "trusted sources for scoring"
        );

        // 3. Search.
        let final_query = biased_query(query, sources.value());
        tracing::debug!(query = %final_query, "final search query");
        let mut results = self.search.search(&final_query, config.num_results).await?;

        // 4. Score each result in turn.
        let mut citation_fallbacks = 0;
        for result in &mut results {
            let url = result.url_str().to_owned();
            let authority_score = authority(&url, sources.value(), config);
            let citations = citation_score(&self.fetcher, &url, config).await;
            if citations.is_fallback() {
                citation_fallbacks += 1;
            }
            let citations = citations.into_inner();
            let score = veracity_score(authority_score, citations, config);
            tracing::debug!(
                url = %url,
                authority = authority_score,
                citations,
                score,
                trust = %TrustLevel::from_score(score),
                description = trust_description(score),
                "scored result"
            );
            result.annotate(score, topic.value());
        }

        Ok(ScoringReport {
            topic,
            sources,
            final_query,
            results,
            citation_fallbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers topic prompts and source prompts from separate scripts.
    struct ScriptedAnswers {
        topic: std::result::Result<&'static str, ()>,
        sources: std::result::Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedAnswers {
        fn new(
            topic: std::result::Result<&'static str, ()>,
            sources: std::result::Result<&'static str, ()>,
        ) -> Self {
            Self {
                topic,
                sources,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AnswerService for ScriptedAnswers {
        async fn answer(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let script = if prompt.contains("primary topic") {
                self.topic
            } else {
                self.sources
            };
            script
                .map(str::to_owned)
                .map_err(|()| VeracityError::Http("service unavailable".into()))
        }
    }

    /// Returns fixed results and records the query it was given.
    struct RecordingSearch {
        urls: Vec<&'static str>,
        fail: bool,
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl RecordingSearch {
        fn returning(urls: Vec<&'static str>) -> Self {
            Self {
                urls,
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                urls: vec![],
                fail: true,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_query(&self) -> Option<(String, usize)> {
            self.seen.lock().ok()?.last().cloned()
        }
    }

    impl SearchService for RecordingSearch {
        async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchResult>> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((query.to_owned(), num_results));
            }
            if self.fail {
                return Err(VeracityError::Search("upstream 503".into()));
            }
            Ok(self.urls.iter().map(|u| SearchResult::with_url(*u)).collect())
        }
    }

    /// Serves one page body for URLs containing `ok`, fails otherwise.
    struct Pages(&'static str);

    impl PageFetcher for Pages {
        async fn fetch(&self, url: &str) -> Result<String> {
            if url.contains("ok") {
                Ok(self.0.to_owned())
            } else {
                Err(VeracityError::Http("timed out".into()))
            }
        }
    }

    const THREE_CITATIONS: &str = r#"<html><body>
        <a href="https://www.nejm.org/doi/1">NEJM</a>
        <a href="https://www.cdc.gov/migraine">CDC</a>
        <a href="https://www.who.int/news">WHO</a>
        <a href="https://example.com/">elsewhere</a>
    </body></html>"#;

    fn pipeline(
        answers: ScriptedAnswers,
        search: RecordingSearch,
        config: ScoringConfig,
    ) -> VeracityPipeline<ScriptedAnswers, RecordingSearch, Pages> {
        VeracityPipeline::new(answers, search, Pages(THREE_CITATIONS), config).expect("pipeline")
    }

    #[test]
    fn biased_query_without_sources_is_unchanged() {
        assert_eq!(biased_query("rust", &TrustedSourceMap::new()), "rust");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ScoringConfig {
            num_results: 0,
            ..Default::default()
        };
        let result = VeracityPipeline::new(
            ScriptedAnswers::new(Ok("Health"), Err(())),
            RecordingSearch::returning(vec![]),
            Pages(""),
            config,
        );
        assert!(matches!(result, Err(VeracityError::Config(_))));
    }

    #[tokio::test]
    async fn blank_query_makes_no_calls() {
        let p = pipeline(
            ScriptedAnswers::new(Ok("Health"), Err(())),
            RecordingSearch::returning(vec![]),
            ScoringConfig::default(),
        );
        let err = p.run("   ").await.unwrap_err();
        assert!(matches!(err, VeracityError::MissingQuery));
        assert_eq!(p.answers.calls.load(Ordering::SeqCst), 0);
        assert!(p.search.last_query().is_none());
    }

    #[tokio::test]
    async fn migraine_scenario_scores_75() {
        let p = pipeline(
            ScriptedAnswers::new(Ok("Health"), Err(())),
            RecordingSearch::returning(vec!["https://www.mayoclinic.org/migraines?ok"]),
            ScoringConfig::default(),
        );
        let report = p.run_detailed("best treatment for migraines").await.expect("run");

        assert_eq!(report.topic, Resolution::Computed("Health".to_owned()));
        assert!(report.sources.is_fallback());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].veracity_score, Some(75));
        assert_eq!(report.results[0].topic.as_deref(), Some("Health"));
        assert_eq!(report.citation_fallbacks, 0);
    }

    #[tokio::test]
    async fn search_receives_biased_query_and_result_count() {
        let p = pipeline(
            ScriptedAnswers::new(Ok("finance"), Ok("bloomberg.com, ft.com")),
            RecordingSearch::returning(vec![]),
            ScoringConfig::default(),
        );
        let report = p.run_detailed("rate cuts").await.expect("run");
        assert!(!report.sources.is_fallback());
        let (query, count) = p.search.last_query().expect("search called");
        assert_eq!(query, "rate cuts (site:bloomberg.com OR site:ft.com)");
        assert_eq!(count, 5);
        assert_eq!(report.final_query, query);
    }

    #[tokio::test]
    async fn empty_sources_leave_query_unbiased() {
        let config = ScoringConfig {
            static_fallback: false,
            ..Default::default()
        };
        let p = pipeline(
            ScriptedAnswers::new(Err(()), Err(())),
            RecordingSearch::returning(vec!["https://a.com/"]),
            config,
        );
        let results = p.run("anything").await.expect("run");
        let (query, _) = p.search.last_query().expect("search called");
        assert_eq!(query, "anything");
        assert_eq!(results[0].topic.as_deref(), Some("Default"));
    }

    #[tokio::test]
    async fn unfetchable_page_scores_on_authority_alone() {
        let p = pipeline(
            ScriptedAnswers::new(Ok("Health"), Err(())),
            RecordingSearch::returning(vec!["https://www.cdc.gov/flu", ""]),
            ScoringConfig::default(),
        );
        let report = p.run_detailed("flu").await.expect("run");
        // 98 * 0.7 = 68.6
        assert_eq!(report.results[0].veracity_score, Some(68));
        // Empty URL: authority 0, no fetch attempted.
        assert_eq!(report.results[1].veracity_score, Some(0));
        assert_eq!(report.citation_fallbacks, 1);
    }

    #[tokio::test]
    async fn search_failure_propagates() {
        let p = pipeline(
            ScriptedAnswers::new(Ok("Health"), Err(())),
            RecordingSearch::failing(),
            ScoringConfig::default(),
        );
        let err = p.run("migraines").await.unwrap_err();
        assert!(matches!(err, VeracityError::Search(_)));
    }

    #[tokio::test]
    async fn strict_mode_rejects_unlisted_topic() {
        let config = ScoringConfig {
            strict_topics: true,
            ..Default::default()
        };
        let p = pipeline(
            ScriptedAnswers::new(Ok("Sports"), Err(())),
            RecordingSearch::returning(vec![]),
            config,
        );
        match p.run("who won the match").await {
            Err(VeracityError::UnsupportedTopic { detected, supported }) => {
                assert_eq!(detected, "Sports");
                assert_eq!(supported, vec!["Health", "Technology", "Finance"]);
            }
            other => panic!("expected UnsupportedTopic, got {other:?}"),
        }
        assert!(p.search.last_query().is_none());
    }

    #[tokio::test]
    async fn strict_mode_rejects_classifier_failure() {
        let config = ScoringConfig {
            strict_topics: true,
            ..Default::default()
        };
        let p = pipeline(
            ScriptedAnswers::new(Err(()), Err(())),
            RecordingSearch::returning(vec![]),
            config,
        );
        let err = p.run("anything").await.unwrap_err();
        assert!(err.to_string().contains("'Default'"));
    }

    #[tokio::test]
    async fn strict_mode_accepts_listed_topic() {
        let config = ScoringConfig {
            strict_topics: true,
            ..Default::default()
        };
        let p = pipeline(
            ScriptedAnswers::new(Ok("Technology"), Err(())),
            RecordingSearch::returning(vec!["https://stackoverflow.com/q/1"]),
            config,
        );
        let results = p.run("borrow checker").await.expect("run");
        // 90 * 0.7 = 63
        assert_eq!(results[0].veracity_score, Some(63));
    }
}
