use tracing::debug;

use super::error::SimilarityError;
use super::types::{PairScore, SimilarityWeights};

/// Cosine similarity clamped to `[-1, 1]`.
///
/// Fails on empty input, mismatched lengths, non-finite components, or a zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.is_empty() || b.is_empty() {
        return Err(SimilarityError::InvalidVector {
            name: "pair",
            reason: "vector is empty".to_string(),
        });
    }
    if a.len() != b.len() {
        return Err(SimilarityError::InvalidVector {
            name: "pair",
            reason: format!("dimension mismatch: {} vs {}", a.len(), b.len()),
        });
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if !dot.is_finite() || !norm_a.is_finite() || !norm_b.is_finite() {
        return Err(SimilarityError::InvalidVector {
            name: "pair",
            reason: "vector contains non-finite values".to_string(),
        });
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::InvalidVector {
            name: "pair",
            reason: "vector has zero norm".to_string(),
        });
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Weighted combination of image/text cosine similarities between two posts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn score(
        &self,
        image_a: &[f32],
        text_a: &[f32],
        image_b: &[f32],
        text_b: &[f32],
    ) -> Result<f32, SimilarityError> {
        Ok(self.score_detailed(image_a, text_a, image_b, text_b)?.score)
    }

    pub fn score_with_weights(
        &self,
        image_a: &[f32],
        text_a: &[f32],
        image_b: &[f32],
        text_b: &[f32],
        weights: &SimilarityWeights,
    ) -> Result<f32, SimilarityError> {
        Ok(combine(image_a, text_a, image_b, text_b, weights)?.score)
    }

    pub fn score_detailed(
        &self,
        image_a: &[f32],
        text_a: &[f32],
        image_b: &[f32],
        text_b: &[f32],
    ) -> Result<PairScore, SimilarityError> {
        combine(image_a, text_a, image_b, text_b, &self.weights)
    }
}

fn combine(
    image_a: &[f32],
    text_a: &[f32],
    image_b: &[f32],
    text_b: &[f32],
    weights: &SimilarityWeights,
) -> Result<PairScore, SimilarityError> {
    weights.validate()?;

    let image_image = labelled(cosine_similarity(image_a, image_b), "emb_a_image/emb_b_image")?;
    let image_text = labelled(cosine_similarity(image_a, text_b), "emb_a_image/emb_b_text")?;
    let text_image = labelled(cosine_similarity(text_a, image_b), "emb_a_text/emb_b_image")?;
    let text_text = labelled(cosine_similarity(text_a, text_b), "emb_a_text/emb_b_text")?;

    let score = weights.image_image * image_image
        + weights.image_text * image_text
        + weights.text_image * text_image
        + weights.text_text * text_text;

    let pair = PairScore {
        score,
        image_image,
        image_text,
        text_image,
        text_text,
    };
    debug!(%pair, "computed pair similarity");
    Ok(pair)
}

fn labelled(
    result: Result<f32, SimilarityError>,
    name: &'static str,
) -> Result<f32, SimilarityError> {
    result.map_err(|err| match err {
        SimilarityError::InvalidVector { reason, .. } => {
            SimilarityError::InvalidVector { name, reason }
        }
        other => other,
    })
}
