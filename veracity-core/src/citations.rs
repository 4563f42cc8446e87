//! Citation scanning: counts outbound links to reputable domains.
//!
//! A result page is fetched once, every `<a href>` is resolved to a host,
//! and each link whose host is (a subdomain of) a reputable domain counts
//! once. The count is capped. Scanning is best-effort: a page that cannot
//! be fetched scores zero and never aborts the pipeline.

use scraper::{Html, Selector};

use crate::config::ScoringConfig;
use crate::domain::{host_of, matches_domain};
use crate::service::PageFetcher;
use crate::types::Resolution;

/// Extract the canonical host of every anchor's link target.
///
/// Relative links, fragments and non-network schemes (`mailto:`,
/// `javascript:`) have no host and are skipped.
pub fn extract_link_hosts(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(host_of)
        .collect()
}

/// Count hosts that fall under any reputable domain, capped at `cap`.
///
/// Each host counts at most once, however many reputable entries it
/// matches.
pub fn count_reputable<S: AsRef<str>>(hosts: &[String], reputable: &[S], cap: u32) -> u32 {
    let found = hosts
        .iter()
        .filter(|host| {
            reputable
                .iter()
                .any(|domain| matches_domain(host, domain.as_ref()))
        })
        .count();
    u32::try_from(found).unwrap_or(u32::MAX).min(cap)
}

/// Count reputable outbound links on an HTML document.
pub fn score_document(html: &str, config: &ScoringConfig) -> u32 {
    let hosts = extract_link_hosts(html);
    count_reputable(&hosts, &config.citation_list, config.max_citations)
}

/// Fetch `url` and return its capped reputable-citation count.
///
/// An empty URL scores zero without a fetch. A failed fetch scores zero
/// and is tagged [`Resolution::Fallback`].
pub async fn citation_score<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    config: &ScoringConfig,
) -> Resolution<u32> {
    if url.trim().is_empty() {
        return Resolution::Computed(0);
    }

    match fetcher.fetch(url).await {
        Ok(html) => Resolution::Computed(score_document(&html, config)),
        Err(err) => {
            tracing::warn!(url, error = %err, "citation scan failed; scoring zero");
            Resolution::Fallback(0)
        }
    }
}
