//! # Error Types
//!
//! Typed errors for the library side of the crate. The binary wraps these in
//! `anyhow::Error` with extra context; library code keeps them precise so a
//! caller can tell which stage of a research session failed.

use thiserror::Error;

/// Failures of the web search provider.
///
/// These never abort a research session: the coordinator degrades them to
/// "no results for this query" (see [`crate::search::search_or_empty`]).
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to perform web search: {0}")]
    SearchFailed(String),

    #[error("Rate limited by search provider, please wait")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Failures while fetching a page for the summarizer.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("URL must start with http:// or https://: {0}")]
    InvalidUrl(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Top-level error of a research session.
///
/// Every variant except [`ResearchError::Config`] and [`ResearchError::Io`]
/// aborts `research()` and is handed to the caller as-is.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Query generation failed: {0}")]
    QueryGeneration(String),

    #[error("Summarization failed for {url}: {message}")]
    Summarization { url: String, message: String },

    #[error("Follow-up evaluation failed: {0}")]
    FollowUp(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResearchError {
    /// Short name of the stage that failed, for user-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::QueryGeneration(_) => "query generation",
            Self::Summarization { .. } => "summarization",
            Self::FollowUp(_) => "follow-up evaluation",
            Self::Synthesis(_) => "synthesis",
            Self::MalformedOutput(_) => "model call",
            Self::Config(_) => "configuration",
            Self::Io(_) => "io",
        }
    }
}
