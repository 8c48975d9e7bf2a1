//! # Tools Module
//!
//! Tools handed to rig agents. The summarizer gets [`PageFetchTool`] so it
//! can read the page it is asked to summarize instead of guessing from the
//! title and URL alone.

use std::time::Duration;

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::html::{page_text, truncate_chars};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches a web page and returns its readable text, truncated.
#[derive(Debug, Clone)]
pub struct PageFetchTool {
    client: reqwest::Client,
    max_chars: usize,
}

impl PageFetchTool {
    /// # Arguments
    /// * `timeout` - Per-request timeout
    /// * `max_chars` - Maximum characters of page text handed to the model
    pub fn new(timeout: Duration, max_chars: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, max_chars })
    }

    /// Fetch `url` and extract its text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        debug!(url = %url, "Fetching page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |ct| ct.contains("html"));

        let body = response.text().await?;
        let text = if is_html { page_text(&body) } else { body };

        Ok(truncate_chars(&text, self.max_chars).to_string())
    }
}

/// Input arguments for the fetch tool.
#[derive(Debug, Deserialize, Serialize)]
pub struct FetchArgs {
    /// The page to read
    pub url: String,
}

impl Tool for PageFetchTool {
    const NAME: &'static str = "fetch_page";

    type Args = FetchArgs;
    type Output = String;
    type Error = FetchError;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Fetch a web page and return its readable text content. Use this to read the source you are summarizing.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "The http(s) URL of the page to read"
                    }
                },
                "required": ["url"]
            }),
        }
    }

    /// Fetch failures are reported to the model as text so it can still
    /// summarize from the title and URL.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        match self.fetch_text(&args.url).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(url = %args.url, error = %e, "Page fetch failed");
                Ok(format!("Failed to fetch content from {}: {}", args.url, e))
            }
        }
    }
}
