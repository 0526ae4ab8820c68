//! Image/text embedding boundary.
//!
//! The CLIP model lives outside this crate; [`ImageTextEmbedder`] is the seam and
//! [`StubEmbedder`] a deterministic stand-in for running without model files.

mod error;
pub mod stub;


pub use error::EmbeddingError;
pub use stub::StubEmbedder;

/// Embeds images and texts into one shared space. Blocking; call from a blocking
/// thread.
pub trait ImageTextEmbedder: Send + Sync {
    fn embedding_dim(&self) -> usize;

    fn embed_image(&self, image: &[u8]) -> Result<Vec<f32>, EmbeddingError>;

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Mean of the per-sentence embeddings, L2-normalized.
    fn embed_sentences(&self, sentences: &[&str]) -> Result<Vec<f32>, EmbeddingError> {
        if sentences.is_empty() {
            return Err(EmbeddingError::EmptyText);
        }

        let mut mean = vec![0.0f32; self.embedding_dim()];
        for sentence in sentences {
            let embedding = self.embed_text(sentence)?;
            if embedding.len() != mean.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "text embedding has {} dimensions, expected {}",
                        embedding.len(),
                        mean.len()
                    ),
                });
            }
            for (acc, value) in mean.iter_mut().zip(embedding) {
                *acc += value;
            }
        }

        let count = sentences.len() as f32;
        for value in &mut mean {
            *value /= count;
        }
        Ok(l2_normalize(mean))
    }

    fn is_stub(&self) -> bool {
        false
    }
}

/// Scales `v` to unit length; a zero vector is returned unchanged.
pub fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
