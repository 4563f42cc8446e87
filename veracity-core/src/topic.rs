//! Topic classification of free-text queries.
//!
//! The answer service is asked for a one-word topic. Classification never
//! fails: transport errors and empty answers both resolve to
//! [`DEFAULT_TOPIC`], tagged as [`Resolution::Fallback`].

use crate::service::AnswerService;
use crate::types::{Resolution, DEFAULT_TOPIC};

/// Build the classification prompt, optionally constrained to `allowed`.
pub fn topic_prompt(query: &str, allowed: Option<&[String]>) -> String {
    let mut prompt =
        format!("What is the single primary topic for the search query: '{query}'?");
    if let Some(topics) = allowed.filter(|t| !t.is_empty()) {
        prompt.push_str(&format!(" Choose one of: {}.", topics.join(", ")));
    }
    prompt.push_str(" Respond with only the single topic word.");
    prompt
}

/// Normalise a raw classifier answer into a topic label.
///
/// Takes the first word, drops surrounding punctuation and quotes, then
/// capitalises the first letter and lower-cases the rest. Returns `None`
/// when nothing usable remains.
pub fn normalize_topic(raw: &str) -> Option<String> {
    let word = raw
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphanumeric());

    let mut chars = word.chars();
    let first = chars.next()?;
    let mut topic: String = first.to_uppercase().collect();
    topic.push_str(&chars.as_str().to_lowercase());
    Some(topic)
}

/// Classify `query` into a topic label.
///
/// Makes exactly one call to `answers`; there is no retry.
pub async fn resolve_topic<A: AnswerService>(
    answers: &A,
    query: &str,
    allowed: Option<&[String]>,
) -> Resolution<String> {
    let prompt = topic_prompt(query, allowed);
    match answers.answer(&prompt).await {
        Ok(raw) => match normalize_topic(&raw) {
            Some(topic) => Resolution::Computed(topic),
            None => {
                tracing::warn!("topic classifier returned no usable label; using default");
                Resolution::Fallback(DEFAULT_TOPIC.to_owned())
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "topic classification failed; using default");
            Resolution::Fallback(DEFAULT_TOPIC.to_owned())
        }
    }
}
