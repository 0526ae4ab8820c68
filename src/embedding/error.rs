use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddingError {
    #[error("unreadable image: {reason}")]
    InvalidImage { reason: String },

    #[error("no text to embed")]
    EmptyText,

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}
