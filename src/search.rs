//! # Search Module
//!
//! The search capability the coordinator depends on, and its DuckDuckGo
//! implementation.
//!
//! - [`SearchProvider`] is the one-method seam; tests substitute their own.
//! - [`search_or_empty`] is the only resilience policy in a research
//!   session: a failing search becomes "no results for this query".
//! - [`DuckDuckGoSearch`] scrapes the DuckDuckGo HTML endpoint, which needs
//!   no API key.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SearchError;
use crate::html::inline_text;
use crate::models::SearchHit;

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Pause before each request; DuckDuckGo throttles bursts aggressively.
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

// =============================================================================
// SEARCH OPTIONS
// =============================================================================

/// Safe-search filtering level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    #[default]
    On,
    Moderate,
    Off,
}

impl SafeSearch {
    /// Value of DuckDuckGo's `kp` parameter.
    fn ddg_param(&self) -> &'static str {
        match self {
            SafeSearch::On => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        }
    }
}

impl FromStr for SafeSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "strict" => Ok(SafeSearch::On),
            "moderate" => Ok(SafeSearch::Moderate),
            "off" => Ok(SafeSearch::Off),
            other => Err(format!("unknown safesearch mode '{other}' (expected on, moderate or off)")),
        }
    }
}

impl fmt::Display for SafeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SafeSearch::On => "on",
            SafeSearch::Moderate => "moderate",
            SafeSearch::Off => "off",
        })
    }
}

/// Restrict results to a recent time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum TimeLimit {
    #[value(name = "d", alias = "day")]
    #[serde(rename = "d")]
    Day,
    #[value(name = "w", alias = "week")]
    #[serde(rename = "w")]
    Week,
    #[value(name = "m", alias = "month")]
    #[serde(rename = "m")]
    Month,
    #[value(name = "y", alias = "year")]
    #[serde(rename = "y")]
    Year,
}

impl TimeLimit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeLimit::Day => "d",
            TimeLimit::Week => "w",
            TimeLimit::Month => "m",
            TimeLimit::Year => "y",
        }
    }
}

impl FromStr for TimeLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(TimeLimit::Day),
            "w" | "week" => Ok(TimeLimit::Week),
            "m" | "month" => Ok(TimeLimit::Month),
            "y" | "year" => Ok(TimeLimit::Year),
            other => Err(format!("unknown time limit '{other}' (expected d, w, m or y)")),
        }
    }
}

/// Per-call search parameters, fixed for a whole research session.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub region: String,
    pub safesearch: SafeSearch,
    pub time_limit: Option<TimeLimit>,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            region: "us-en".to_string(),
            safesearch: SafeSearch::On,
            time_limit: None,
            max_results: 3,
        }
    }
}

// =============================================================================
// SEARCH CAPABILITY
// =============================================================================

/// A web search backend returning raw, unranked hits.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

/// Run a search, turning any provider failure into an empty hit list.
pub async fn search_or_empty(
    provider: &dyn SearchProvider,
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchHit> {
    match provider.search(query, options).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!(query = %query, error = %e, "Search failed, treating as no results");
            Vec::new()
        }
    }
}

// =============================================================================
// DUCKDUCKGO HTML SEARCH
// =============================================================================

static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\b([^>]*\bclass="[^"]*\bresult__a\b[^"]*"[^>]*)>(.*?)</a>"#)
        .expect("static regex")
});

static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<(?:a|div|td)\b[^>]*\bclass="[^"]*\bresult__snippet\b[^"]*"[^>]*>(.*?)</(?:a|div|td)>"#,
    )
    .expect("static regex")
});

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bhref="([^"]*)""#).expect("static regex"));

/// DuckDuckGo HTML search.
///
/// One `reqwest::Client` is built up front and reused for every query; it is
/// internally reference-counted, so sharing a `DuckDuckGoSearch` across
/// sessions needs no extra locking.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl DuckDuckGoSearch {
    /// Create a provider whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
        })
    }

    /// Point the provider at another host (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    fn query_params<'a>(query: &'a str, options: &'a SearchOptions) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("q", query),
            ("kl", options.region.as_str()),
            ("kp", options.safesearch.ddg_param()),
        ];
        if let Some(limit) = options.time_limit {
            params.push(("df", limit.as_str()));
        }
        params
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError> {
        info!(query = %query, "Performing web search");

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}/html/", self.base_url);
        debug!(url = %url, region = %options.region, "Fetching search results");

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(query, options))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SearchError::RateLimited);
            }
            return Err(SearchError::SearchFailed(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        let hits = parse_results(&body, options.max_results);

        if hits.is_empty() {
            warn!(query = %query, "No search results found");
        } else {
            info!(query = %query, count = hits.len(), "Search completed");
        }

        Ok(hits)
    }
}

/// Extract up to `max_results` hits from a DuckDuckGo HTML result page.
///
/// Each `result__a` anchor starts a hit; the first `result__snippet` before
/// the next anchor is its snippet. Pages without result anchors fall back to
/// scanning redirect links, titling each hit by its domain.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    let mut seen_urls = HashSet::new();

    let anchors: Vec<_> = RESULT_LINK_RE.captures_iter(html).collect();
    for (i, caps) in anchors.iter().enumerate() {
        if hits.len() >= max_results {
            break;
        }
        let Some(url) = HREF_RE
            .captures(&caps[1])
            .and_then(|href| resolve_link(&href[1]))
        else {
            continue;
        };
        if !seen_urls.insert(url.clone()) {
            continue;
        }

        let block_start = caps.get(0).map_or(0, |m| m.end());
        let block_end = anchors
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());
        let snippet = SNIPPET_RE
            .captures(&html[block_start..block_end])
            .map(|s| inline_text(&s[1]))
            .unwrap_or_default();

        hits.push(SearchHit {
            title: inline_text(&caps[2]),
            url,
            snippet,
        });
    }

    if anchors.is_empty() {
        for segment in html.split("uddg=").skip(1) {
            if hits.len() >= max_results {
                break;
            }
            let end = segment
                .find(|c| c == '&' || c == '"' || c == '\'')
                .unwrap_or(segment.len());
            let Some(url) = decode_redirect(&segment[..end]) else {
                continue;
            };
            if seen_urls.insert(url.clone()) {
                hits.push(SearchHit {
                    title: extract_domain(&url).unwrap_or_else(|| "Result".to_string()),
                    url,
                    snippet: String::new(),
                });
            }
        }
    }

    hits
}

/// Resolve a result href to the target URL, unwrapping DuckDuckGo redirects.
/// Internal and sponsored DuckDuckGo links resolve to `None`.
fn resolve_link(href: &str) -> Option<String> {
    let href = href.replace("&amp;", "&");
    if let Some((_, encoded)) = href.split_once("uddg=") {
        let end = encoded.find('&').unwrap_or(encoded.len());
        return decode_redirect(&encoded[..end]);
    }
    if href.starts_with("//") {
        accept_url(format!("https:{}", href))
    } else {
        accept_url(href)
    }
}

fn decode_redirect(encoded: &str) -> Option<String> {
    let url = urlencoding::decode(encoded).ok()?.into_owned();
    accept_url(url)
}

fn accept_url(url: String) -> Option<String> {
    let internal = extract_domain(&url).is_some_and(|d| d.ends_with("duckduckgo.com"));
    (url.starts_with("http") && !internal).then_some(url)
}

/// Extract the domain name from a URL.
fn extract_domain(url: &str) -> Option<String> {
    url.split("//")
        .nth(1)?
        .split('/')
        .next()
        .map(|s| s.to_string())
}
