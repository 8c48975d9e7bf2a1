//! # Configuration Module
//!
//! Loads configuration from the environment (and a `.env` file, if present),
//! starting from defaults that match a local Ollama setup.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::coordinator::ResearchSettings;
use crate::search::{SafeSearch, SearchOptions, TimeLimit};

/// Main configuration for the research assistant.
#[derive(Debug, Clone)]
pub struct Config {
    /// The Ollama model for query generation and summarization
    pub model: String,

    /// Optional stronger model for follow-up decisions and synthesis
    pub synthesis_model: Option<String>,

    /// Ollama server URL (default: http://localhost:11434)
    pub ollama_host: String,

    /// Temperature for LLM responses (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// Upper bound on research rounds, the first one included
    pub max_rounds: usize,

    /// Results summarized per query
    pub picks_per_query: usize,

    /// Raw hits requested from the search provider per query
    pub results_per_query: usize,

    /// DuckDuckGo region code, e.g. "us-en"
    pub region: String,

    pub safesearch: SafeSearch,

    /// Only return results from the last day/week/month/year
    pub time_limit: Option<TimeLimit>,

    pub search_timeout_secs: u64,

    pub fetch_timeout_secs: u64,

    /// Characters of page text the summarizer sees per source
    pub fetch_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            synthesis_model: None,
            ollama_host: "http://localhost:11434".to_string(),
            temperature: 0.7,
            max_rounds: 3,
            picks_per_query: 2,
            results_per_query: 3,
            region: "us-en".to_string(),
            safesearch: SafeSearch::On,
            time_limit: None,
            search_timeout_secs: 30,
            fetch_timeout_secs: 10,
            fetch_max_chars: 5000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first; a missing
    /// file is not an error.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(val) = lookup("OLLAMA_MODEL") {
            config.model = val;
        }

        if let Some(val) = lookup("SYNTHESIS_MODEL") {
            config.synthesis_model = Some(val);
        }

        if let Some(val) = lookup("OLLAMA_API_BASE_URL") {
            config.ollama_host = val;
        }

        if let Some(val) = lookup("TEMPERATURE") {
            config.temperature = val
                .parse()
                .context("TEMPERATURE must be a valid floating-point number (e.g., 0.7)")?;
        }

        parse_into(&lookup, "MAX_ROUNDS", &mut config.max_rounds)?;
        parse_into(&lookup, "PICKS_PER_QUERY", &mut config.picks_per_query)?;
        parse_into(&lookup, "RESULTS_PER_QUERY", &mut config.results_per_query)?;

        if let Some(val) = lookup("SEARCH_REGION") {
            config.region = val;
        }

        if let Some(val) = lookup("SEARCH_SAFESEARCH") {
            config.safesearch = SafeSearch::from_str(&val).map_err(anyhow::Error::msg)?;
        }

        if let Some(val) = lookup("SEARCH_TIMELIMIT").filter(|v| !v.trim().is_empty()) {
            config.time_limit = Some(TimeLimit::from_str(&val).map_err(anyhow::Error::msg)?);
        }

        parse_into(&lookup, "SEARCH_TIMEOUT_SECS", &mut config.search_timeout_secs)?;
        parse_into(&lookup, "FETCH_TIMEOUT_SECS", &mut config.fetch_timeout_secs)?;
        parse_into(&lookup, "FETCH_MAX_CHARS", &mut config.fetch_max_chars)?;

        Ok(config)
    }

    /// Validate the configuration before any research starts.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "Temperature must be between 0.0 and 2.0, got: {}",
                self.temperature
            );
        }

        if self.model.is_empty() {
            anyhow::bail!("OLLAMA_MODEL cannot be empty");
        }

        if matches!(&self.synthesis_model, Some(m) if m.is_empty()) {
            anyhow::bail!("SYNTHESIS_MODEL cannot be empty when set");
        }

        for (name, value) in [
            ("MAX_ROUNDS", self.max_rounds),
            ("PICKS_PER_QUERY", self.picks_per_query),
            ("RESULTS_PER_QUERY", self.results_per_query),
            ("FETCH_MAX_CHARS", self.fetch_max_chars),
        ] {
            if value == 0 {
                anyhow::bail!("{} must be at least 1", name);
            }
        }

        if self.search_timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            anyhow::bail!("Timeouts must be at least 1 second");
        }

        if self.region.trim().is_empty() {
            anyhow::bail!("SEARCH_REGION cannot be empty");
        }

        Ok(())
    }

    /// The coordinator-facing subset of the configuration.
    pub fn research_settings(&self) -> ResearchSettings {
        ResearchSettings {
            max_rounds: self.max_rounds,
            picks_per_query: self.picks_per_query,
            search: SearchOptions {
                region: self.region.clone(),
                safesearch: self.safesearch,
                time_limit: self.time_limit,
                max_results: self.results_per_query,
            },
        }
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(val) = lookup(key) {
        *target = val
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid positive integer", key))?;
    }
    Ok(())
}
