use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreedError {
    #[error("breed mappings are not initialized")]
    NotInitialized,
}

/// Failures inside the classification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("unreadable image: {reason}")]
    InvalidImage { reason: String },

    #[error("classifier warmup failed: {reason}")]
    WarmupFailed { reason: String },

    #[error("classification failed: {reason}")]
    InferenceFailed { reason: String },
}
