//! # Research Coordinator
//!
//! Drives one research session from a topic to a cited report:
//!
//! ```text
//! Init -> GeneratingQueries -> RoundActive(1)
//!      -> [EvaluatingFollowUp -> RoundActive(n+1)]*   (while n < max_rounds)
//!      -> Synthesizing -> Done
//! ```
//!
//! Every step runs strictly in sequence; the only suspension points are the
//! capability calls. Search failures are absorbed (the query simply yields
//! no results); every other capability failure ends the session and is
//! returned from [`ResearchCoordinator::research`] unchanged.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::adapters::Capabilities;
use crate::error::ResearchError;
use crate::html::truncate_chars;
use crate::models::{FollowUpDecision, SearchResult};
use crate::progress::{NoopObserver, ProgressEvent, ProgressObserver};
use crate::scoring::{rank_hits, MIN_MATCH_SCORE};
use crate::search::{search_or_empty, SearchOptions};

const SUMMARY_PREVIEW_CHARS: usize = 100;

/// Loop and search controls for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchSettings {
    /// Upper bound on research rounds, the first one included
    pub max_rounds: usize,
    /// Results summarized per query
    pub picks_per_query: usize,
    pub search: SearchOptions,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            picks_per_query: 2,
            search: SearchOptions::default(),
        }
    }
}

/// Where a session currently is. After a failed `research()` call the phase
/// stays at the step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchPhase {
    Init,
    GeneratingQueries,
    RoundActive { round: usize },
    EvaluatingFollowUp { round: usize },
    Synthesizing,
    Done,
}

/// Owns the state of one research session.
pub struct ResearchCoordinator {
    query: String,
    settings: ResearchSettings,
    capabilities: Capabilities,
    observer: Arc<dyn ProgressObserver>,
    phase: ResearchPhase,
    round_count: usize,
    results: Vec<SearchResult>,
    generated_queries: Vec<String>,
}

impl ResearchCoordinator {
    pub fn new(query: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            query: query.into(),
            settings: ResearchSettings::default(),
            capabilities,
            observer: Arc::new(NoopObserver),
            phase: ResearchPhase::Init,
            round_count: 0,
            results: Vec::new(),
            generated_queries: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: ResearchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    pub fn phase(&self) -> ResearchPhase {
        self.phase
    }

    /// Rounds started so far in the current session.
    pub fn round_count(&self) -> usize {
        self.round_count
    }

    /// Summarized sources, in the order they were produced. Position `i`
    /// holds the result cited as `[i + 1]`.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Queries produced by the initial generation step.
    pub fn generated_queries(&self) -> &[String] {
        &self.generated_queries
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }

    /// Run the whole session and return the final markdown report.
    ///
    /// State from a previous call is discarded first.
    pub async fn research(&mut self) -> Result<String, ResearchError> {
        self.reset();
        info!(query = %self.query, max_rounds = self.settings.max_rounds, "Starting research session");

        self.enter(ResearchPhase::GeneratingQueries);
        self.section("GENERATE QUERIES");
        let plan = self
            .capabilities
            .query_generator
            .generate_queries(&self.query)
            .await?;
        self.generated_queries = plan.queries;

        if !plan.thoughts.trim().is_empty() {
            self.thought(&plan.thoughts);
        }
        self.log("Generated Search Queries:");
        for (i, q) in self.generated_queries.iter().enumerate() {
            self.log(format!("  {}. {}", i + 1, q));
        }

        let mut batch = self.generated_queries.clone();
        loop {
            self.round_count += 1;
            let round = self.round_count;
            self.enter(ResearchPhase::RoundActive { round });
            self.section(&format!("RESEARCH ROUND {}", round));
            self.research_queries(&batch).await?;

            if round >= self.settings.max_rounds {
                debug!(round, "Round cap reached, skipping follow-up evaluation");
                break;
            }

            self.enter(ResearchPhase::EvaluatingFollowUp { round });
            self.section("EVALUATE FOLLOW-UP");
            let decision = self.follow_up_decision().await?;

            match decision.next_queries() {
                Some(queries) => batch = queries.to_vec(),
                None if decision.should_follow_up => {
                    warn!(round, "Follow-up requested without queries, finishing research");
                    self.log("Follow-up requested but no queries were proposed. Synthesizing report...");
                    break;
                }
                None => {
                    self.log("No more research needed. Synthesizing report...");
                    break;
                }
            }
        }

        self.enter(ResearchPhase::Synthesizing);
        self.section("SYNTHESIS");
        let report = self
            .capabilities
            .synthesizer
            .synthesize(&self.query, &self.results)
            .await?;

        self.log("✓ Research complete!\n");
        self.enter(ResearchPhase::Done);
        info!(
            rounds = self.round_count,
            sources = self.results.len(),
            "Research session complete"
        );

        Ok(report)
    }

    /// Search, rank and summarize each query of one round, appending results.
    async fn research_queries(&mut self, queries: &[String]) -> Result<(), ResearchError> {
        for q in queries {
            self.log(format!("Searching for: {}", q));
            let hits = search_or_empty(
                self.capabilities.search.as_ref(),
                q,
                &self.settings.search,
            )
            .await;

            let ranking = rank_hits(q, &hits, self.settings.picks_per_query);
            for c in &ranking.scored {
                self.log(format!(
                    "[DEBUG] MatchScore={:.2} | Title={} | URL={}",
                    c.score, c.title, c.url
                ));
            }
            self.log(format!(
                "[DEBUG] Picked {} of {} results (threshold {})",
                ranking.picks.len(),
                ranking.total(),
                MIN_MATCH_SCORE
            ));

            for pick in ranking.picks {
                self.log(format!("  Picked (match {:.2}): {}", pick.score, pick.title));
                self.log(format!("  URL: {}", pick.url));
                self.log("  Analyzing content...");

                let summary = self
                    .capabilities
                    .summarizer
                    .summarize(&pick.title, &pick.url)
                    .await?;
                self.log(format!("  Summary: {}\n", preview(&summary)));

                self.results.push(SearchResult {
                    index: self.results.len() + 1,
                    title: pick.title,
                    url: pick.url,
                    summary,
                });
            }
        }
        Ok(())
    }

    async fn follow_up_decision(&self) -> Result<FollowUpDecision, ResearchError> {
        let decision = self
            .capabilities
            .follow_up
            .decide(&self.query, &self.results)
            .await?;

        if let Some(thoughts) = decision.thoughts.as_deref().filter(|t| !t.trim().is_empty()) {
            self.thought(thoughts);
        }

        // Proposals are shown even when the decision discards them.
        if !decision.queries.is_empty() {
            self.log("Proposed follow-up queries:");
            for (i, q) in decision.queries.iter().enumerate() {
                self.log(format!("  {}. {}", i + 1, q));
            }
        }

        let status = if decision.should_follow_up {
            "More research needed"
        } else {
            "Research complete"
        };
        self.log(format!("Decision: {}", status));
        self.log(format!("Reasoning: {}", decision.reasoning));

        Ok(decision)
    }

    fn reset(&mut self) {
        self.phase = ResearchPhase::Init;
        self.round_count = 0;
        self.results.clear();
        self.generated_queries.clear();
    }

    fn enter(&mut self, phase: ResearchPhase) {
        debug!(from = ?self.phase, to = ?phase, "Research phase transition");
        self.phase = phase;
    }

    fn log(&self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "research::log", "{}", line);
        self.observer.notify(ProgressEvent::Log(line));
    }

    fn thought(&self, text: &str) {
        debug!(target: "research::thought", "{}", text);
        self.observer.notify(ProgressEvent::Thought(text.to_string()));
    }

    fn section(&self, title: &str) {
        let bar = "-".repeat(72);
        self.log(format!("\n{bar}\n{title}\n{bar}\n"));
    }
}

fn preview(summary: &str) -> String {
    let head = truncate_chars(summary, SUMMARY_PREVIEW_CHARS);
    if head.len() < summary.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}
