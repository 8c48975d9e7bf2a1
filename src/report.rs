//! Caller-side presentation of a finished session: the numbered Sources
//! listing and the single downloadable markdown document.
//!
//! Both number sources with the index each result carries, which is the
//! number the report's `[n]` citations refer to.

use std::fs;
use std::path::Path;

use crate::error::ResearchError;
use crate::models::SearchResult;

/// Plain numbered Sources listing for terminal output.
pub fn render_sources(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut out = String::from("Sources\n");
    for r in results {
        out.push_str(&format!("[{}] {}\n    URL: {}\n", r.index, r.title, r.url));
    }
    out
}

/// Assemble the downloadable markdown document.
///
/// Sections, in order: Final Report, Sources (omitted when empty), Thinking
/// Log and Live Log (each omitted when empty).
pub fn build_download_markdown(
    final_report: &str,
    results: &[SearchResult],
    thoughts: &[String],
    logs: &[String],
) -> String {
    let mut parts: Vec<String> = vec!["# Final Report\n".to_string(), final_report.trim().to_string(), String::new()];

    if !results.is_empty() {
        parts.push("# Sources\n".to_string());
        for r in results {
            parts.push(format!("## [{}] {}\n", r.index, r.title));
            parts.push(format!("- **URL:** {}\n", r.url));
            parts.push(r.summary.clone());
            parts.push(String::new());
        }
    }

    if !thoughts.is_empty() {
        parts.push("# Thinking Log (captured snippets)\n".to_string());
        parts.extend(thoughts.iter().map(|t| format!("- *{}*", t)));
        parts.push(String::new());
    }

    if !logs.is_empty() {
        parts.push("# Live Log\n".to_string());
        parts.push("```text".to_string());
        parts.extend(logs.iter().cloned());
        parts.push("```".to_string());
        parts.push(String::new());
    }

    parts.join("\n").trim().to_string()
}

/// Write the download document to `path`, creating parent directories.
pub fn write_markdown(path: &Path, markdown: &str) -> Result<(), ResearchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markdown)?;
    Ok(())
}
