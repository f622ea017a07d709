//! Title extraction
//!
//! A single pattern match rather than a DOM parse: the first
//! `<title ...>...</title>` element, matched case-insensitively with a
//! non-greedy body that does not cross line terminators. Unclosed or
//! multi-line titles fail to match.

use regex::Regex;
use std::sync::OnceLock;

/// Title reported when no usable response was obtained
pub const SENTINEL_TITLE: &str = "NO RESPONSE";

const TITLE_PATTERN: &str = r"(?i)<title[^>]*>([^\n\r\x{2028}\x{2029}]*?)</title>";

fn title_regex() -> &'static Regex {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    TITLE_RE.get_or_init(|| Regex::new(TITLE_PATTERN).expect("title pattern is valid"))
}

/// Extracts the trimmed inner text of the first `<title>` element
///
/// Trimming strips Unicode whitespace and U+FEFF.
///
/// Nested markup inside the element is returned verbatim. An element that is
/// present but empty yields `Some("")`.
///
/// # Example
///
/// ```
/// use title_scout::fetch::extract_title;
///
/// let html = "<html><head><title>  Example  </title></head></html>";
/// assert_eq!(extract_title(html), Some("Example".to_string()));
/// assert_eq!(extract_title("<html></html>"), None);
/// ```
pub fn extract_title(body: &str) -> Option<String> {
    title_regex()
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|inner| {
            inner
                .as_str()
                .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                .to_string()
        })
}
