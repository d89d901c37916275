use serde::Serialize;
use serde_json::Value;

use crate::analysis::models::{SuggestionSet, SUGGESTION_CATEGORIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionFormat {
    /// Arbitrary JSON (string, list or object) from a structured reply.
    Structured,
    /// Free text from an unstructured reply, shown as markdown.
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    pub key: String,
    pub title: String,
    pub format: SectionFormat,
    pub content: Value,
}

/// Lays out a suggestion set for display: known categories first, in their
/// fixed order, then any extra keys the model produced, then raw text.
pub fn render_suggestions(set: &SuggestionSet) -> Vec<RenderedSection> {
    let mut sections: Vec<RenderedSection> = SUGGESTION_CATEGORIES
        .iter()
        .filter_map(|&(key, title)| {
            set.category(key).map(|content| RenderedSection {
                key: key.to_string(),
                title: title.to_string(),
                format: SectionFormat::Structured,
                content: content.clone(),
            })
        })
        .collect();

    let is_known = |key: &str| {
        key == SuggestionSet::FALLBACK_KEY || SUGGESTION_CATEGORIES.iter().any(|(k, _)| *k == key)
    };
    for (key, content) in set.0.iter().filter(|(key, _)| !is_known(key.as_str())) {
        sections.push(RenderedSection {
            key: key.clone(),
            title: humanize_key(key),
            format: SectionFormat::Structured,
            content: content.clone(),
        });
    }

    if let Some(raw) = set.category(SuggestionSet::FALLBACK_KEY) {
        sections.push(RenderedSection {
            key: SuggestionSet::FALLBACK_KEY.to_string(),
            title: "Suggestions".to_string(),
            format: SectionFormat::Markdown,
            content: raw.clone(),
        });
    }

    sections
}

/// `sections_to_add` → `Sections To Add`
fn humanize_key(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
