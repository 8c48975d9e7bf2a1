//! Plain-text digests of accumulated findings.
//!
//! Entries are numbered with each result's carried `index`, never with a
//! fresh enumeration, so the numbers a model cites are the numbers shown in
//! the Sources listing.

use crate::models::SearchResult;
use crate::prompts::ResearchPrompts;

fn entry(result: &SearchResult) -> String {
    format!(
        "\n{}. Title: {}\n   URL: {}\n   Summary: {}\n",
        result.index, result.title, result.url, result.summary
    )
}

/// Input for the follow-up decision: the original query and every result
/// gathered so far.
pub fn findings_digest(original_query: &str, results: &[SearchResult]) -> String {
    let mut lines = vec![
        format!("Original Query: {}", original_query),
        String::new(),
        "Current Findings:".to_string(),
    ];
    lines.extend(results.iter().map(entry));
    lines.join("\n")
}

/// Input for synthesis: citation instructions, the query, then the
/// numbered results.
pub fn synthesis_input(original_query: &str, results: &[SearchResult]) -> String {
    let mut text = format!(
        "{}Query: {}\n\nSearch Results:\n",
        ResearchPrompts::citation_instructions(),
        original_query
    );
    for result in results {
        text.push_str(&entry(result));
    }
    text
}
