//! Capability seams for the model-backed steps of a research session.
//!
//! Each trait has exactly one method so a test can stand in a deterministic
//! fake for any single step. [`crate::agent::OllamaResearchAgents`] implements
//! all four against a local model.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ResearchError;
use crate::models::{FollowUpDecision, QueryPlan, SearchResult};
use crate::search::SearchProvider;

/// Turns a topic into a short list of search queries plus rationale.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate_queries(&self, topic: &str) -> Result<QueryPlan, ResearchError>;
}

/// Summarizes one picked search result.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, url: &str) -> Result<String, ResearchError>;
}

/// Decides whether the findings so far call for another round.
#[async_trait]
pub trait FollowUpDecider: Send + Sync {
    async fn decide(
        &self,
        original_query: &str,
        results: &[SearchResult],
    ) -> Result<FollowUpDecision, ResearchError>;
}

/// Merges every accumulated result into the final markdown report.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        original_query: &str,
        results: &[SearchResult],
    ) -> Result<String, ResearchError>;
}

/// The full set of capabilities a coordinator drives.
#[derive(Clone)]
pub struct Capabilities {
    pub query_generator: Arc<dyn QueryGenerator>,
    pub search: Arc<dyn SearchProvider>,
    pub summarizer: Arc<dyn Summarizer>,
    pub follow_up: Arc<dyn FollowUpDecider>,
    pub synthesizer: Arc<dyn Synthesizer>,
}

impl Capabilities {
    /// Use one value for all four model roles and a separate search provider.
    pub fn from_agents<A>(agents: Arc<A>, search: Arc<dyn SearchProvider>) -> Self
    where
        A: QueryGenerator + Summarizer + FollowUpDecider + Synthesizer + 'static,
    {
        Self {
            query_generator: agents.clone(),
            search,
            summarizer: agents.clone(),
            follow_up: agents.clone(),
            synthesizer: agents,
        }
    }
}
