use serde::{Deserialize, Serialize};

use super::error::NormalizationError;

/// Free-form description submitted for normalization. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRequest {
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub features: String,
}

impl NormalizationRequest {
    pub fn new(
        breed: impl Into<String>,
        colors: impl Into<String>,
        features: impl Into<String>,
    ) -> Self {
        Self {
            breed: breed.into(),
            colors: colors.into(),
            features: features.into(),
        }
    }
}

/// Exactly three trimmed, non-empty sentences.
///
/// The only constructors are [`NormalizationResult::from_sentences`], which enforces the
/// invariant, and the crate-internal fallback constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizationResult([String; 3]);

impl NormalizationResult {
    /// Trims each candidate, drops empty ones, and keeps the first three.
    pub fn from_sentences<I, S>(sentences: I) -> Result<Self, NormalizationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kept: Vec<String> = sentences
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .take(3)
            .collect();

        match <[String; 3]>::try_from(kept) {
            Ok(sentences) => Ok(Self(sentences)),
            Err(kept) => Err(NormalizationError::IncompleteResult { found: kept.len() }),
        }
    }

    pub(crate) fn from_static(sentences: [&'static str; 3]) -> Self {
        Self(sentences.map(str::to_string))
    }

    pub fn sentences(&self) -> &[String; 3] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Body of a Gemini `generateContent` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, temperature: f32) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

/// Raw `generateContent` response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGenerativeResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl RawGenerativeResponse {
    /// Builds a single-candidate response carrying `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ContentPart {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }

    /// Text of the first part of the first candidate, if it is non-blank.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Stages of a normalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Building,
    Calling,
    Validating,
    Succeeded,
    Retrying,
    Exhausted,
    Fallback,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Building => "BUILDING",
            PipelineState::Calling => "CALLING",
            PipelineState::Validating => "VALIDATING",
            PipelineState::Succeeded => "SUCCEEDED",
            PipelineState::Retrying => "RETRYING",
            PipelineState::Exhausted => "EXHAUSTED",
            PipelineState::Fallback => "FALLBACK",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a pipeline run plus how it was obtained.
#[derive(Debug, Clone)]
pub struct NormalizationOutcome {
    pub result: NormalizationResult,
    /// Gateway calls made (1-based).
    pub attempts: u32,
    /// Terminal state: [`PipelineState::Succeeded`] or [`PipelineState::Fallback`].
    pub state: PipelineState,
    pub last_error: Option<NormalizationError>,
}

impl NormalizationOutcome {
    pub fn is_fallback(&self) -> bool {
        self.state == PipelineState::Fallback
    }
}
