//! Derives the short plain-text excerpt shown on listing pages from a post's
//! lines.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("valid link regex"));

/// Maximum number of characters taken from the post before the ellipsis.
pub const MAX_SUMMARY_CHARS: usize = 200;

/// How many lines past the title/byline we look at.
const SCAN_WINDOW: usize = 5;

/// How many lines of prose make up a summary.
const SUMMARY_LINES: usize = 2;

const ELLIPSIS: &str = "...";

/// Builds a summary from the lines of a post. Line 0 is the title. The
/// blank lines that follow it are skipped, then one more line if it carries
/// an emphasis marker (the `*date | By author*` byline). Up to
/// [`SCAN_WINDOW`] lines after that are scanned for the first
/// [`SUMMARY_LINES`] lines that are neither blank nor headings. Markdown
/// markers are stripped and links reduced to their text.
///
/// Returns an empty string when the post has no prose near the top.
pub fn summarize(lines: &[&str]) -> String {
    let start = body_offset(lines);
    let collected: Vec<&str> = lines
        .iter()
        .skip(start)
        .take(SCAN_WINDOW)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .take(SUMMARY_LINES)
        .collect();

    let joined: String = collected
        .join(" ")
        .chars()
        .filter(|c| !matches!(*c, '#' | '*' | '>'))
        .collect();
    let plain = MARKDOWN_LINK.replace_all(&joined, "$1");
    truncate(plain.trim())
}

/// Index of the first line after the title and byline.
fn body_offset(lines: &[&str]) -> usize {
    let mut offset = 1;
    while offset < lines.len() && lines[offset].trim().is_empty() {
        offset += 1;
    }
    if offset < lines.len() && is_byline(lines[offset]) {
        offset += 1;
    }
    offset
}

fn is_byline(line: &str) -> bool {
    line.contains('*')
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_SUMMARY_CHARS) {
        None => s.to_owned(),
        Some((end, _)) => format!("{}{}", s[..end].trim_end(), ELLIPSIS),
    }
}
