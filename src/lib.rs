//! # Web Research Agent
//!
//! An iterative web research assistant. Given a topic it plans search
//! queries, searches the web, ranks hits with a cheap lexical scorer,
//! summarizes the best pages, asks whether another round is worthwhile, and
//! finally synthesizes a markdown report with `[n]` citations.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use web_research_agent::{Capabilities, Config, DuckDuckGoSearch, OllamaResearchAgents, ResearchCoordinator};
//!
//! let config = Config::from_env()?;
//! let agents = Arc::new(OllamaResearchAgents::new(&config)?);
//! let search = Arc::new(DuckDuckGoSearch::new(std::time::Duration::from_secs(30))?);
//!
//! let mut coordinator = ResearchCoordinator::new("Rust async runtimes", Capabilities::from_agents(agents, search))
//!     .with_settings(config.research_settings());
//! let report = coordinator.research().await?;
//! ```

pub mod adapters;
pub mod agent;
pub mod config;
pub mod coordinator;
pub mod digest;
pub mod error;
pub mod html;
pub mod models;
pub mod progress;
pub mod prompts;
pub mod report;
pub mod scoring;
pub mod search;
pub mod tools;

pub use adapters::{Capabilities, FollowUpDecider, QueryGenerator, Summarizer, Synthesizer};
pub use agent::OllamaResearchAgents;
pub use config::Config;
pub use coordinator::{ResearchCoordinator, ResearchPhase, ResearchSettings};
pub use error::{FetchError, ResearchError, SearchError};
pub use models::{FollowUpDecision, QueryPlan, SearchHit, SearchResult};
pub use progress::{NoopObserver, ProgressEvent, ProgressObserver, TranscriptObserver};
pub use scoring::{match_score, rank_hits, Candidate, Ranking, MIN_MATCH_SCORE};
pub use search::{search_or_empty, DuckDuckGoSearch, SafeSearch, SearchOptions, SearchProvider, TimeLimit};
