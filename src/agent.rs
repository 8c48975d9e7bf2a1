//! # Agent Module
//!
//! Rig agents, served by a local Ollama instance, behind the four model
//! capabilities of a research session. Each call builds a short-lived agent
//! with the role's preamble; the summarizer additionally gets the page fetch
//! tool and a small multi-turn budget to use it.

use std::time::Duration;

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::ollama;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::adapters::{FollowUpDecider, QueryGenerator, Summarizer, Synthesizer};
use crate::config::Config;
use crate::digest::{findings_digest, synthesis_input};
use crate::error::ResearchError;
use crate::html::truncate_chars;
use crate::models::{FollowUpDecision, QueryPlan, SearchResult};
use crate::prompts::ResearchPrompts;
use crate::tools::PageFetchTool;

/// Tool-call rounds the summarizer may spend fetching before it must answer.
const SUMMARIZER_TURNS: usize = 3;

/// Ollama-backed implementation of every model capability.
pub struct OllamaResearchAgents {
    model: String,
    synthesis_model: String,
    temperature: f64,
    fetch_tool: PageFetchTool,
}

impl OllamaResearchAgents {
    /// Create the agents from configuration.
    ///
    /// Rig's Ollama client reads its host from `OLLAMA_API_BASE_URL`, so the
    /// configured host is exported there first.
    pub fn new(config: &Config) -> Result<Self, ResearchError> {
        std::env::set_var("OLLAMA_API_BASE_URL", &config.ollama_host);

        let fetch_tool = PageFetchTool::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.fetch_max_chars,
        )
        .map_err(|e| ResearchError::Config(format!("page fetch client: {}", e)))?;

        debug!(
            host = %config.ollama_host,
            model = %config.model,
            "Configured Ollama research agents"
        );

        Ok(Self {
            model: config.model.clone(),
            synthesis_model: config
                .synthesis_model
                .clone()
                .unwrap_or_else(|| config.model.clone()),
            temperature: config.temperature as f64,
            fetch_tool,
        })
    }

    /// One single-turn prompt against `model` with the given preamble.
    async fn prompt(&self, model: &str, preamble: &str, input: &str) -> Result<String, String> {
        let agent = ollama::Client::from_env()
            .agent(model)
            .preamble(preamble)
            .temperature(self.temperature)
            .build();

        agent.prompt(input).await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl QueryGenerator for OllamaResearchAgents {
    async fn generate_queries(&self, topic: &str) -> Result<QueryPlan, ResearchError> {
        info!(topic = %topic, "Generating search queries");

        let reply = self
            .prompt(&self.model, &ResearchPrompts::query_generator(), topic)
            .await
            .map_err(ResearchError::QueryGeneration)?;

        parse_query_plan(&reply)
    }
}

/// Parse a query-generation reply, dropping blank queries. A plan with no
/// usable query is rejected.
pub fn parse_query_plan(reply: &str) -> Result<QueryPlan, ResearchError> {
    let mut plan: QueryPlan = parse_json_reply(reply)?;
    plan.queries = plan
        .queries
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if plan.queries.is_empty() {
        return Err(ResearchError::MalformedOutput(
            "query plan contains no search queries".to_string(),
        ));
    }
    Ok(plan)
}

#[async_trait]
impl Summarizer for OllamaResearchAgents {
    async fn summarize(&self, title: &str, url: &str) -> Result<String, ResearchError> {
        let agent = ollama::Client::from_env()
            .agent(&self.model)
            .preamble(ResearchPrompts::summarizer())
            .temperature(self.temperature)
            .tool(self.fetch_tool.clone())
            .build();

        let input = format!("Title: {}\nURL: {}", title, url);
        let summary = agent
            .prompt(&input)
            .multi_turn(SUMMARIZER_TURNS)
            .await
            .map_err(|e| ResearchError::Summarization {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(summary.trim().to_string())
    }
}

#[async_trait]
impl FollowUpDecider for OllamaResearchAgents {
    async fn decide(
        &self,
        original_query: &str,
        results: &[SearchResult],
    ) -> Result<FollowUpDecision, ResearchError> {
        let digest = findings_digest(original_query, results);
        let reply = self
            .prompt(&self.synthesis_model, ResearchPrompts::follow_up(), &digest)
            .await
            .map_err(ResearchError::FollowUp)?;

        parse_json_reply(&reply)
    }
}

#[async_trait]
impl Synthesizer for OllamaResearchAgents {
    async fn synthesize(
        &self,
        original_query: &str,
        results: &[SearchResult],
    ) -> Result<String, ResearchError> {
        let input = synthesis_input(original_query, results);
        let report = self
            .prompt(&self.synthesis_model, ResearchPrompts::synthesizer(), &input)
            .await
            .map_err(ResearchError::Synthesis)?;

        Ok(report.trim().to_string())
    }
}

/// Parse the JSON object embedded in a model reply.
///
/// Local models often wrap the object in a code fence or a sentence of
/// prose; everything outside the outermost braces is ignored.
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, ResearchError> {
    let malformed = |reason: String| {
        ResearchError::MalformedOutput(format!(
            "{} in reply: {}",
            reason,
            truncate_chars(reply.trim(), 200)
        ))
    };

    let start = reply.find('{').ok_or_else(|| malformed("no JSON object".to_string()))?;
    let end = reply.rfind('}').ok_or_else(|| malformed("no JSON object".to_string()))?;
    if end < start {
        return Err(malformed("no JSON object".to_string()));
    }

    serde_json::from_str(&reply[start..=end]).map_err(|e| malformed(e.to_string()))
}
