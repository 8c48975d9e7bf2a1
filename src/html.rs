//! Small HTML-to-text helpers shared by the search parser and page fetcher.
//!
//! These are regex based and only aim at readable text for lexical scoring
//! and model input, not at faithful rendering.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script>|<style\b.*?</style>|<noscript\b.*?</noscript>|<!--.*?-->")
        .expect("static regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Decode the handful of entities DuckDuckGo and typical pages emit.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove tags from an inline fragment, decode entities and collapse whitespace.
pub fn inline_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    collapse_whitespace(&decode_entities(&stripped))
}

/// Readable text of a whole page: script/style/comment blocks dropped, tags
/// stripped, entities decoded, whitespace collapsed.
pub fn page_text(html: &str) -> String {
    let without_blocks = BLOCK_RE.replace_all(html, " ");
    inline_text(&without_blocks)
}

pub fn collapse_whitespace(text: &str) -> String {
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Truncate to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
