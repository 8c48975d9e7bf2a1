//! Deterministic stand-ins for every research capability.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use web_research_agent::{
    Capabilities, FollowUpDecider, FollowUpDecision, QueryGenerator, QueryPlan, ResearchError,
    SearchError, SearchHit, SearchOptions, SearchProvider, SearchResult, Summarizer, Synthesizer,
};

// =============================================================================
// QUERY GENERATION
// =============================================================================

pub struct FixedQueries {
    plan: Option<QueryPlan>,
}

impl FixedQueries {
    pub fn new(queries: &[&str], thoughts: &str) -> Self {
        Self {
            plan: Some(QueryPlan {
                queries: queries.iter().map(|q| q.to_string()).collect(),
                thoughts: thoughts.to_string(),
            }),
        }
    }

    pub fn failing() -> Self {
        Self { plan: None }
    }
}

#[async_trait]
impl QueryGenerator for FixedQueries {
    async fn generate_queries(&self, _topic: &str) -> Result<QueryPlan, ResearchError> {
        self.plan
            .clone()
            .ok_or_else(|| ResearchError::QueryGeneration("model unavailable".to_string()))
    }
}

// =============================================================================
// SEARCH
// =============================================================================

/// Returns `hits_per_query` hits whose titles contain the query, so each
/// scores well above the pick threshold. Queries can be overridden or made
/// to fail.
#[derive(Default)]
pub struct FakeSearch {
    hits_per_query: usize,
    overrides: HashMap<String, Vec<SearchHit>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn new(hits_per_query: usize) -> Self {
        Self {
            hits_per_query,
            ..Self::default()
        }
    }

    pub fn with_hits(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.overrides.insert(query.to_string(), hits);
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn hit_for(query: &str, n: usize) -> SearchHit {
    let slug = query.to_lowercase().replace(' ', "-");
    SearchHit::new(
        format!("{} result {}", query, n),
        format!("https://example.com/{}/{}", slug, n),
        format!("About {}", query),
    )
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(
        &self,
        query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());

        if self.failing.contains(query) {
            return Err(SearchError::SearchFailed("HTTP 503".to_string()));
        }
        if let Some(hits) = self.overrides.get(query) {
            return Ok(hits.clone());
        }
        Ok((1..=self.hits_per_query).map(|n| hit_for(query, n)).collect())
    }
}

// =============================================================================
// SUMMARIZATION
// =============================================================================

#[derive(Default)]
pub struct FakeSummarizer {
    fixed: Option<String>,
    fail_on_url: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    /// Summaries read "Summary of <title>".
    pub fn echo() -> Self {
        Self::default()
    }

    pub fn fixed(text: &str) -> Self {
        Self {
            fixed: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_on(url: &str) -> Self {
        Self {
            fail_on_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, title: &str, url: &str) -> Result<String, ResearchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if self.fail_on_url.as_deref() == Some(url) {
            return Err(ResearchError::Summarization {
                url: url.to_string(),
                message: "model timed out".to_string(),
            });
        }
        Ok(self
            .fixed
            .clone()
            .unwrap_or_else(|| format!("Summary of {}", title)))
    }
}

// =============================================================================
// FOLLOW-UP
// =============================================================================

/// Plays back scripted decisions, then repeats `fallback`. Records how many
/// results were visible at each call.
pub struct ScriptedFollowUp {
    script: Mutex<VecDeque<FollowUpDecision>>,
    fallback: FollowUpDecision,
    fails: bool,
    seen_result_counts: Mutex<Vec<usize>>,
}

impl ScriptedFollowUp {
    pub fn new(script: Vec<FollowUpDecision>, fallback: FollowUpDecision) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            fails: false,
            seen_result_counts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::always_stop()
        }
    }

    pub fn always_stop() -> Self {
        Self::new(vec![], FollowUpDecision::complete("Findings are sufficient"))
    }

    pub fn always_continue() -> Self {
        Self::new(
            vec![],
            FollowUpDecision::follow_up("Gaps remain", vec!["deeper follow-up".to_string()]),
        )
    }

    pub fn calls(&self) -> usize {
        self.seen_result_counts.lock().unwrap().len()
    }

    pub fn seen_result_counts(&self) -> Vec<usize> {
        self.seen_result_counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl FollowUpDecider for ScriptedFollowUp {
    async fn decide(
        &self,
        _original_query: &str,
        results: &[SearchResult],
    ) -> Result<FollowUpDecision, ResearchError> {
        self.seen_result_counts.lock().unwrap().push(results.len());
        if self.fails {
            return Err(ResearchError::FollowUp("connection refused".to_string()));
        }
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Echoes every summary followed by its citation number.
#[derive(Default)]
pub struct EchoSynthesizer {
    fails: bool,
    calls: Mutex<usize>,
}

impl EchoSynthesizer {
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Synthesizer for EchoSynthesizer {
    async fn synthesize(
        &self,
        original_query: &str,
        results: &[SearchResult],
    ) -> Result<String, ResearchError> {
        *self.calls.lock().unwrap() += 1;
        if self.fails {
            return Err(ResearchError::Synthesis("model not found".to_string()));
        }
        let body: Vec<String> = results
            .iter()
            .map(|r| format!("{} [{}]", r.summary, r.index))
            .collect();
        Ok(format!("# {}\n\n{}", original_query, body.join("\n")))
    }
}

// =============================================================================
// WIRING
// =============================================================================

pub struct Fakes {
    pub queries: Arc<FixedQueries>,
    pub search: Arc<FakeSearch>,
    pub summarizer: Arc<FakeSummarizer>,
    pub follow_up: Arc<ScriptedFollowUp>,
    pub synthesizer: Arc<EchoSynthesizer>,
}

impl Fakes {
    pub fn new(
        queries: FixedQueries,
        search: FakeSearch,
        summarizer: FakeSummarizer,
        follow_up: ScriptedFollowUp,
    ) -> Self {
        Self {
            queries: Arc::new(queries),
            search: Arc::new(search),
            summarizer: Arc::new(summarizer),
            follow_up: Arc::new(follow_up),
            synthesizer: Arc::new(EchoSynthesizer::default()),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: EchoSynthesizer) -> Self {
        self.synthesizer = Arc::new(synthesizer);
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            query_generator: self.queries.clone(),
            search: self.search.clone(),
            summarizer: self.summarizer.clone(),
            follow_up: self.follow_up.clone(),
            synthesizer: self.synthesizer.clone(),
        }
    }
}
