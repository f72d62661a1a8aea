//! Statement text normalization.
//!
//! Comments are stripped before segmentation so a keyword inside a comment
//! never registers as a clause boundary. Whitespace is then collapsed to
//! single spaces, which lets the segmenter match multi-word clause phrases
//! (`GROUP BY`, `INSERT INTO`) literally.

use regex::Regex;
use std::sync::OnceLock;

fn line_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--[^\n]*").expect("Invalid regex pattern"))
}

fn block_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex pattern"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"))
}

/// Normalize raw statement text: strip `--` and `/* */` comments, collapse
/// consecutive whitespace to single spaces, trim, and drop a trailing `;`.
pub(crate) fn normalize(sql: &str) -> String {
    let without_line = line_comment_regex().replace_all(sql, " ");
    let without_block = block_comment_regex().replace_all(&without_line, " ");
    let collapsed = whitespace_regex().replace_all(&without_block, " ");

    collapsed.trim().trim_end_matches(';').trim_end().to_string()
}
