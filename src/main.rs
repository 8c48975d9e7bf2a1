//! # Web Research Agent CLI
//!
//! Runs one research session against a local Ollama model and DuckDuckGo,
//! streaming progress to stderr and printing the cited report to stdout.
//!
//! ## Quick Start
//! ```bash
//! cargo run -- "What is the population of Canada?"
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use web_research_agent::progress::MultiObserver;
use web_research_agent::report::{build_download_markdown, render_sources, write_markdown};
use web_research_agent::{
    Capabilities, Config, DuckDuckGoSearch, OllamaResearchAgents, ProgressEvent,
    ProgressObserver, ResearchCoordinator, SafeSearch, TimeLimit, TranscriptObserver,
};

// =============================================================================
// CLI ARGUMENTS
// =============================================================================
#[derive(Parser, Debug)]
#[command(
    name = "web-research-agent",
    version,
    about = "Iterative web research: plan queries, search, summarize, and synthesize a cited report",
    long_about = r#"
Web Research Agent - multi-round web research with cited reports.

For a topic it will:
  1. Plan a few focused search queries
  2. Search DuckDuckGo and rank the hits lexically
  3. Summarize the best pages
  4. Decide whether another round of research is needed
  5. Synthesize a markdown report with [n] citations

PREREQUISITES:
  1. Install Ollama: https://ollama.ai
  2. Pull a model: ollama pull llama3.2
  3. Start Ollama: ollama serve

EXAMPLES:
  web-research-agent "Population of Canada 2023"
  web-research-agent --max-rounds 1 --timelimit y "Rust async runtimes"
  web-research-agent -o report.md --include-logs "Heat pump efficiency in cold climates"
"#
)]
struct Args {
    /// The research topic or question to investigate
    #[arg(value_name = "QUERY")]
    query: String,

    /// Ollama model for query planning and summaries
    #[arg(short = 'm', long = "model", env = "OLLAMA_MODEL")]
    model: Option<String>,

    /// Ollama model for follow-up decisions and synthesis
    #[arg(long = "synthesis-model", env = "SYNTHESIS_MODEL")]
    synthesis_model: Option<String>,

    /// Maximum number of research rounds
    #[arg(short = 'r', long = "max-rounds")]
    max_rounds: Option<usize>,

    /// Results summarized per query
    #[arg(long = "picks-per-query")]
    picks_per_query: Option<usize>,

    /// Raw search results fetched per query
    #[arg(long = "results-per-query")]
    results_per_query: Option<usize>,

    /// DuckDuckGo region code (e.g. us-en, ca-en, wt-wt)
    #[arg(long = "region")]
    region: Option<String>,

    /// Safe-search level
    #[arg(long = "safesearch", value_enum)]
    safesearch: Option<SafeSearch>,

    /// Only search the last day (d), week (w), month (m) or year (y)
    #[arg(long = "timelimit", value_enum)]
    timelimit: Option<TimeLimit>,

    /// Write the report, sources and (optionally) logs to a markdown file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Include the thinking and live logs in the --output file
    #[arg(long = "include-logs", requires = "output")]
    include_logs: bool,

    /// Do not append "(as of <today>)" to the topic
    #[arg(long = "no-date-anchor")]
    no_date_anchor: bool,

    /// Enable verbose/debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            info!(model = %model, "Using model from command line");
            config.model = model.clone();
        }
        if let Some(model) = &self.synthesis_model {
            config.synthesis_model = Some(model.clone());
        }
        if let Some(n) = self.max_rounds {
            config.max_rounds = n;
        }
        if let Some(n) = self.picks_per_query {
            config.picks_per_query = n;
        }
        if let Some(n) = self.results_per_query {
            config.results_per_query = n;
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(safesearch) = self.safesearch {
            config.safesearch = safesearch;
        }
        if let Some(limit) = self.timelimit {
            config.time_limit = Some(limit);
        }
    }

    fn topic(&self) -> String {
        if self.no_date_anchor {
            self.query.clone()
        } else {
            format!(
                "{} (as of {})",
                self.query.trim(),
                Local::now().format("%Y-%m-%d")
            )
        }
    }
}

// =============================================================================
// MAIN FUNCTION
// =============================================================================
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    info!("Web Research Agent starting up...");

    let mut config = Config::from_env()?;
    args.apply_to(&mut config);
    config.validate()?;

    info!(
        model = %config.model,
        host = %config.ollama_host,
        max_rounds = config.max_rounds,
        "Configuration loaded"
    );

    let agents = Arc::new(OllamaResearchAgents::new(&config)?);
    let search = Arc::new(
        DuckDuckGoSearch::new(Duration::from_secs(config.search_timeout_secs))
            .context("Failed to build search client")?,
    );

    let transcript = Arc::new(TranscriptObserver::new());
    let observers: Vec<Arc<dyn ProgressObserver>> =
        vec![Arc::new(console_observer), transcript.clone()];
    let observer = MultiObserver(observers);

    let topic = args.topic();
    info!(topic = %topic, "Running research");

    let mut coordinator =
        ResearchCoordinator::new(topic, Capabilities::from_agents(agents, search))
            .with_settings(config.research_settings())
            .with_observer(Arc::new(observer));

    let report = match coordinator.research().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, stage = e.stage(), "Research failed");
            eprintln!("\n❌ Research failed during {}: {}", e.stage(), e);

            let message = e.to_string().to_lowercase();
            if message.contains("connection refused") {
                eprintln!("\n💡 Tip: Make sure Ollama is running:");
                eprintln!("   ollama serve");
            } else if message.contains("model") && message.contains("not found") {
                eprintln!("\n💡 Tip: Make sure the model is installed:");
                eprintln!("   ollama pull {}", config.model);
            }

            return Err(e.into());
        }
    };

    println!("\n{}", "=".repeat(60));
    println!("RESEARCH REPORT");
    println!("{}\n", "=".repeat(60));
    println!("{}", report);
    println!("\n{}", "=".repeat(60));
    print!("{}", render_sources(coordinator.results()));

    if let Some(path) = &args.output {
        let captured = transcript.snapshot();
        let (thoughts, logs) = if args.include_logs {
            (captured.thoughts, captured.logs)
        } else {
            (Vec::new(), Vec::new())
        };
        let markdown = build_download_markdown(&report, coordinator.results(), &thoughts, &logs);
        write_markdown(path, &markdown)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    info!("Research completed successfully");
    Ok(())
}

/// Streams log lines and thoughts to stderr, keeping stdout for the report.
fn console_observer(event: ProgressEvent) {
    match event {
        ProgressEvent::Log(line) => eprintln!("{}", line),
        ProgressEvent::Thought(text) => eprintln!("Thoughts: {}", text),
    }
}

// =============================================================================
// LOGGING INITIALIZATION
// =============================================================================
/// `RUST_LOG` wins when set; otherwise this crate logs at INFO, or DEBUG
/// with `--verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        "web_research_agent=debug,warn"
    } else {
        "web_research_agent=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
