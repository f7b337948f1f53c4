//! `path:line:column` suffix parsing for goto-line mode.

use regex::Regex;
use std::sync::OnceLock;

/// Trailing `:line` or `:line:col`
static LINE_COLUMN_REGEX: OnceLock<Regex> = OnceLock::new();

fn suffix_regex() -> &'static Regex {
    LINE_COLUMN_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<path>.+?)(?::(?P<line>\d+))(?::(?P<col>\d+))?$")
            .expect("Failed to compile line/column regex")
    })
}

/// Split a trailing `:line` or `:line:column` off `input`.
///
/// Returns the input unchanged when it carries no such suffix. Line and
/// column numbers are 1-based; zero is treated as absent.
pub fn parse_line_column(input: &str) -> (&str, Option<u32>, Option<u32>) {
    let Some(caps) = suffix_regex().captures(input) else {
        return (input, None, None);
    };
    let Some(path) = caps.name("path") else {
        return (input, None, None);
    };
    let number = |name: &str| {
        caps.name(name)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|n| *n > 0)
    };
    (path.as_str(), number("line"), number("col"))
}
