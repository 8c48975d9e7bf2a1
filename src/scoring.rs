//! # Lexical Scoring
//!
//! A deliberately small relevance heuristic used to pre-rank search hits
//! before any of them are sent to a model for summarization. It is pure and
//! deterministic: no I/O, no allocation beyond the token sets.
//!
//! Weights: title 0.6, snippet 0.25, url 0.15, plus a 0.1 bonus when the
//! whole tokenized query appears verbatim inside the tokenized title. The
//! sum is not clamped, so a perfect match scores 1.1.

use std::collections::HashSet;

use crate::models::SearchHit;

/// Hits scoring below this are only picked by the single-best fallback.
pub const MIN_MATCH_SCORE: f64 = 0.26;

const TITLE_WEIGHT: f64 = 0.6;
const SNIPPET_WEIGHT: f64 = 0.25;
const URL_WEIGHT: f64 = 0.15;
const PHRASE_BONUS: f64 = 0.1;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "on", "for", "to", "with", "by", "about", "is",
    "are", "was", "were", "be",
];

/// Lowercase, split on every run of characters outside `[a-z0-9]`, and drop
/// stop words. Token order and duplicates are preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Relevance of a hit to `query`, nominally in `[0, 1.1]`.
///
/// A query with no tokens left after stop-word removal scores 0.0.
pub fn match_score(query: &str, title: &str, url: &str, snippet: &str) -> f64 {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return 0.0;
    }
    let title_tokens = tokenize(title);

    let q: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let overlap = |tokens: &[String]| -> f64 {
        let other: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        q.intersection(&other).count() as f64 / q.len().max(1) as f64
    };

    let phrase_bonus = if title_tokens.join(" ").contains(&query_tokens.join(" ")) {
        PHRASE_BONUS
    } else {
        0.0
    };

    TITLE_WEIGHT * overlap(&title_tokens)
        + SNIPPET_WEIGHT * overlap(&tokenize(snippet))
        + URL_WEIGHT * overlap(&tokenize(url))
        + phrase_bonus
}

/// A scored hit awaiting selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub score: f64,
    pub title: String,
    pub url: String,
}

/// Result of ranking one query's hits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Every hit with its score, in provider order.
    pub scored: Vec<Candidate>,
    /// Selected hits, best first.
    pub picks: Vec<Candidate>,
}

impl Ranking {
    pub fn total(&self) -> usize {
        self.scored.len()
    }
}

/// Score `hits` against `query` and select at most `picks_per_query`.
///
/// Hits are stably sorted by descending score (ties keep provider order) and
/// those at or above [`MIN_MATCH_SCORE`] are kept. When none clears the
/// threshold the single best hit is picked instead, so a query contributes
/// nothing only when the search itself came back empty.
pub fn rank_hits(query: &str, hits: &[SearchHit], picks_per_query: usize) -> Ranking {
    let scored: Vec<Candidate> = hits
        .iter()
        .map(|hit| Candidate {
            score: match_score(query, &hit.title, &hit.url, &hit.snippet),
            title: hit.title.clone(),
            url: hit.url.clone(),
        })
        .collect();

    let mut ordered = scored.clone();
    ordered.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut picks: Vec<Candidate> = ordered
        .iter()
        .filter(|c| c.score >= MIN_MATCH_SCORE)
        .take(picks_per_query)
        .cloned()
        .collect();

    if picks.is_empty() {
        picks.extend(ordered.into_iter().take(1));
    }

    Ranking { scored, picks }
}
