use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Result of interpreting a model response, before it is collapsed to a mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Structured(Map<String, Value>),
    Raw(String),
}

impl ModelOutput {
    /// Interprets the span from the first `{` to the last `}` as a JSON object.
    /// Anything else, including malformed JSON, is kept verbatim as `Raw`.
    pub fn parse(text: &str) -> Self {
        let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
            return ModelOutput::Raw(text.to_string());
        };
        if start >= end {
            return ModelOutput::Raw(text.to_string());
        }

        match serde_json::from_str::<Map<String, Value>>(&text[start..=end]) {
            Ok(map) => ModelOutput::Structured(map),
            Err(e) => {
                warn!("Model output is not valid JSON, keeping raw text: {e}");
                ModelOutput::Raw(text.to_string())
            }
        }
    }

    /// Collapses to a mapping; raw text lands under `fallback_key`.
    pub fn into_map(self, fallback_key: &str) -> Map<String, Value> {
        match self {
            ModelOutput::Structured(map) => map,
            ModelOutput::Raw(text) => {
                let mut map = Map::new();
                map.insert(fallback_key.to_string(), Value::String(text));
                map
            }
        }
    }
}

/// Semantic fields extracted from a résumé or a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredAnalysis(pub Map<String, Value>);

impl StructuredAnalysis {
    pub const FALLBACK_KEY: &'static str = "raw_analysis";

    pub fn from_model_output(output: ModelOutput) -> Self {
        Self(output.into_map(Self::FALLBACK_KEY))
    }

    /// True when the model output could not be parsed and only raw text is held.
    pub fn is_raw(&self) -> bool {
        self.0.len() == 1 && self.0.contains_key(Self::FALLBACK_KEY)
    }
}

/// Advice categories, in display order: (key, section title).
pub const SUGGESTION_CATEGORIES: &[(&str, &str)] = &[
    ("skills_gap_analysis", "Skills Gap Analysis"),
    ("experience_alignment", "Experience Alignment"),
    ("specific_wording_suggestions", "Keyword Suggestions"),
    ("sections_to_add_or_emphasize", "Sections to Add or Emphasize"),
    ("general_formatting_improvements", "General Improvements"),
];

/// Tailoring advice synthesized from a résumé analysis and a job analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionSet(pub Map<String, Value>);

impl SuggestionSet {
    pub const FALLBACK_KEY: &'static str = "suggestions";

    pub fn from_model_output(output: ModelOutput) -> Self {
        Self(output.into_map(Self::FALLBACK_KEY))
    }

    pub fn category(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Unstructured advice, present when the model did not return JSON.
    pub fn raw_text(&self) -> Option<&str> {
        self.0.get(Self::FALLBACK_KEY).and_then(Value::as_str)
    }
}
