//! Small text utilities for presenting LLM output

use regex::Regex;
use std::sync::LazyLock;

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("valid regex"));

/// Replace markdown links `[text](url)` with their visible text.
/// LLM completions frequently embed links that render poorly in a
/// terminal.
pub fn strip_markdown_links(text: &str) -> String {
    MARKDOWN_LINK.replace_all(text, "$1").into_owned()
}
