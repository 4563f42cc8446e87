//! Host extraction and domain matching.
//!
//! Hosts are compared in a canonical form: lower-cased, without a
//! trailing root dot and without a leading `www.` label. A host matches a
//! domain when it is that domain or a subdomain of it, with the match
//! anchored on a label boundary so `xmayoclinic.org` does not match
//! `mayoclinic.org`.

use url::Url;

use crate::config::ScoringConfig;
use crate::types::TrustedSourceMap;

/// Canonicalise a host or domain string for comparison.
///
/// # Examples
///
/// ```
/// use veracity_core::domain::normalize_host;
///
/// assert_eq!(normalize_host("WWW.MayoClinic.org."), "mayoclinic.org");
/// ```
pub fn normalize_host(raw: &str) -> String {
    let lower = raw.trim().trim_end_matches('.').to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_owned(),
        None => lower,
    }
}

/// Extract the canonical host from an absolute or protocol-relative URL.
///
/// Returns `None` for empty input, relative references and anything the
/// URL parser rejects.
pub fn host_of(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let full = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_owned()
    };

    let parsed = Url::parse(&full).ok()?;
    let host = normalize_host(parsed.host_str()?);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Returns `true` if `host` is `domain` or one of its subdomains.
///
/// Both arguments are expected in canonical form (see [`normalize_host`]).
pub fn matches_domain(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Returns `true` for `.gov` and `.edu` hosts.
pub fn is_institutional(host: &str) -> bool {
    host.ends_with(".gov") || host.ends_with(".edu")
}

/// Authority score (0–100) of a result URL against a trusted-source map.
///
/// - empty or host-less URL → `0`
/// - first trusted domain the host matches → that domain's score
/// - otherwise `.gov`/`.edu` host → `config.institutional_bonus`
/// - otherwise → `config.baseline_authority`
pub fn authority(url: &str, trusted: &TrustedSourceMap, config: &ScoringConfig) -> u32 {
    let Some(host) = host_of(url) else {
        return 0;
    };

    if let Some((_, score)) = trusted
        .iter()
        .find(|(domain, _)| matches_domain(&host, domain))
    {
        return score;
    }

    if is_institutional(&host) {
        return config.institutional_bonus;
    }

    config.baseline_authority
}
