use thiserror::Error;

/// Failures of a single normalization attempt.
///
/// None of these reach callers of [`NormalizationPipeline`](super::NormalizationPipeline):
/// every variant triggers a retry and, once attempts run out, the fallback sentences.
#[derive(Debug, Clone, Error)]
pub enum NormalizationError {
    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("generative response contained no usable text")]
    EmptyResponse,

    #[error("failed to parse generated JSON: {reason}")]
    Parse { reason: String },

    #[error("incomplete result: expected 3 sentences, got {found}")]
    IncompleteResult { found: usize },
}

impl NormalizationError {
    /// Short machine-readable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizationError::Transport { .. } => "transport",
            NormalizationError::EmptyResponse => "empty_response",
            NormalizationError::Parse { .. } => "parse",
            NormalizationError::IncompleteResult { .. } => "incomplete_result",
        }
    }
}

impl From<reqwest::Error> for NormalizationError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        NormalizationError::Transport {
            reason: err.without_url().to_string(),
        }
    }
}
