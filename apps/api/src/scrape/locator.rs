//! Section Locator — finds where the job description starts inside scraped page text.
//!
//! Markers are tried in priority order, not by position: if both "responsibilities"
//! and "job description" appear, the excerpt starts at "job description" even when
//! it comes later in the page.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the excerpt length, in characters.
pub const MAX_EXCERPT_CHARS: usize = 5000;

/// (label, case-insensitive pattern), highest priority first.
const MARKER_PATTERNS: &[(&str, &str)] = &[
    ("job description", r"(?i)job description"),
    ("about the job", r"(?i)about the job"),
    ("about this role", r"(?i)about this role"),
    ("responsibilities", r"(?i)responsibilities"),
    ("what you'll do", r"(?i)what you['’]ll do"),
    ("requirements", r"(?i)requirements"),
];

struct Marker {
    label: &'static str,
    pattern: Regex,
}

static MARKERS: LazyLock<Vec<Marker>> = LazyLock::new(|| {
    MARKER_PATTERNS
        .iter()
        .map(|&(label, pattern)| Marker {
            label,
            pattern: Regex::new(pattern).expect("marker patterns are valid regexes"),
        })
        .collect()
});

/// A bounded slice of the page text, plus the marker that anchored it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    /// `None` when no marker matched and the excerpt is the head of the page.
    pub marker: Option<&'static str>,
    pub text: &'a str,
}

pub fn locate_job_section(text: &str) -> Excerpt<'_> {
    for marker in MARKERS.iter() {
        if let Some(found) = marker.pattern.find(text) {
            return Excerpt {
                marker: Some(marker.label),
                text: truncate_chars(&text[found.start()..], MAX_EXCERPT_CHARS),
            };
        }
    }

    Excerpt {
        marker: None,
        text: truncate_chars(text, MAX_EXCERPT_CHARS),
    }
}

/// Cuts `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
