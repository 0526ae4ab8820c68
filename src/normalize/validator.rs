use serde_json::{Map, Value};

use super::error::NormalizationError;
use super::types::{NormalizationResult, RawGenerativeResponse};

const SENTENCE_KEYS: [&str; 3] = ["sentence1", "sentence2", "sentence3"];

/// Turns a raw generator response into a [`NormalizationResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        raw: &RawGenerativeResponse,
    ) -> Result<NormalizationResult, NormalizationError> {
        let text = raw.first_text().ok_or(NormalizationError::EmptyResponse)?;
        self.validate_text(text)
    }

    /// Validates the generated text itself, fenced or not.
    pub fn validate_text(&self, text: &str) -> Result<NormalizationResult, NormalizationError> {
        let cleaned = strip_code_fences(text);

        let value: Value =
            serde_json::from_str(cleaned).map_err(|e| NormalizationError::Parse {
                reason: e.to_string(),
            })?;
        let Value::Object(object) = value else {
            return Err(NormalizationError::Parse {
                reason: format!("expected a JSON object, got {}", json_kind(&value)),
            });
        };

        let sentences = collect_sentences(&object);
        NormalizationResult::from_sentences(sentences)
    }
}

fn collect_sentences(object: &Map<String, Value>) -> Vec<&str> {
    SENTENCE_KEYS
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
