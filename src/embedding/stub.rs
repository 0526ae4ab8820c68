use tracing::debug;

use super::{EmbeddingError, ImageTextEmbedder, l2_normalize};
use crate::hashing::hash_with_domain;
use crate::image::ImageFormat;

/// Deterministic embedder: unit vectors derived from a BLAKE3 seed of the input.
///
/// Identical inputs embed identically; images and texts use separate hash domains.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    embedding_dim: usize,
}

impl StubEmbedder {
    pub fn new(embedding_dim: usize) -> Result<Self, EmbeddingError> {
        if embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }
        Ok(Self { embedding_dim })
    }

    fn seeded_vector(&self, seed: u64) -> Vec<f32> {
        let mut embedding = Vec::with_capacity(self.embedding_dim);
        let mut state = seed;

        for _ in 0..self.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(embedding)
    }
}

impl ImageTextEmbedder for StubEmbedder {
    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
        let format = ImageFormat::sniff(image).ok_or_else(|| EmbeddingError::InvalidImage {
            reason: "unrecognized image format".to_string(),
        })?;
        debug!(format = format.mime_type(), bytes = image.len(), "stub image embedding");
        Ok(self.seeded_vector(hash_with_domain("image", image)))
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbeddingError::EmptyText);
        }
        Ok(self.seeded_vector(hash_with_domain("text", text.as_bytes())))
    }

    fn is_stub(&self) -> bool {
        true
    }
}
