use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("invalid vector {name}: {reason}")]
    InvalidVector { name: &'static str, reason: String },

    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },
}
