//! Data records shared by the coordinator and its adapters.

use serde::{Deserialize, Serialize};

/// A raw hit as returned by the search provider, before ranking.
///
/// Providers that omit a field leave it empty; scoring treats an empty
/// field as contributing no tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The title of the search result
    #[serde(default)]
    pub title: String,

    /// The URL of the result
    #[serde(default)]
    pub url: String,

    /// A snippet/description of the content
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A summarized source accumulated during a research session.
///
/// `index` is the 1-based citation number. It is assigned when the result is
/// appended and always equals the result's position in the session list + 1,
/// so `[n]` citations in the final report line up with the Sources listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub index: usize,
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// Output of the query generation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub queries: Vec<String>,
    #[serde(default)]
    pub thoughts: String,
}

/// Whether another research round is warranted, and with which queries.
///
/// `queries` is only meaningful when `should_follow_up` is true.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpDecision {
    pub should_follow_up: bool,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub queries: Vec<String>,
    /// Free-text rationale surfaced to the thought stream, if the model gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoughts: Option<String>,
}

impl FollowUpDecision {
    /// A decision that ends the research loop.
    pub fn complete(reasoning: impl Into<String>) -> Self {
        Self {
            should_follow_up: false,
            reasoning: reasoning.into(),
            queries: Vec::new(),
            thoughts: None,
        }
    }

    /// A decision requesting another round with the given queries.
    pub fn follow_up(reasoning: impl Into<String>, queries: Vec<String>) -> Self {
        Self {
            should_follow_up: true,
            reasoning: reasoning.into(),
            queries,
            thoughts: None,
        }
    }

    /// Queries for the next round, or `None` when the loop should stop.
    ///
    /// A decision that asks for more research but names no queries is
    /// treated as "research complete".
    pub fn next_queries(&self) -> Option<&[String]> {
        if self.should_follow_up && !self.queries.is_empty() {
            Some(&self.queries)
        } else {
            None
        }
    }
}
