use serde::{Deserialize, Serialize};

use super::error::SimilarityError;
use crate::constants::{
    DEFAULT_W_II, DEFAULT_W_IT, DEFAULT_W_TI, DEFAULT_W_TT, WEIGHT_SUM_TOLERANCE,
};

/// Weights of the four cross-modal similarities.
///
/// Serialized with the short keys used on the wire (`w_ii`, `w_it`, `w_ti`, `w_tt`).
/// Weights are applied as given; they are not re-normalized to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    #[serde(rename = "w_ii")]
    pub image_image: f32,
    #[serde(rename = "w_it")]
    pub image_text: f32,
    #[serde(rename = "w_ti")]
    pub text_image: f32,
    #[serde(rename = "w_tt")]
    pub text_text: f32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            image_image: DEFAULT_W_II,
            image_text: DEFAULT_W_IT,
            text_image: DEFAULT_W_TI,
            text_text: DEFAULT_W_TT,
        }
    }
}

impl SimilarityWeights {
    pub fn new(
        image_image: f32,
        image_text: f32,
        text_image: f32,
        text_text: f32,
    ) -> Result<Self, SimilarityError> {
        let weights = Self {
            image_image,
            image_text,
            text_image,
            text_text,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), SimilarityError> {
        for (name, value) in self.named() {
            if !value.is_finite() {
                return Err(SimilarityError::InvalidWeights {
                    reason: format!("{name} is not finite"),
                });
            }
            if value < 0.0 {
                return Err(SimilarityError::InvalidWeights {
                    reason: format!("{name} is negative ({value})"),
                });
            }
        }
        Ok(())
    }

    pub fn sum(&self) -> f32 {
        self.image_image + self.image_text + self.text_image + self.text_text
    }

    pub fn sums_to_one(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    fn named(&self) -> [(&'static str, f32); 4] {
        [
            ("w_ii", self.image_image),
            ("w_it", self.image_text),
            ("w_ti", self.text_image),
            ("w_tt", self.text_text),
        ]
    }
}

/// Combined score plus the four component similarities it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairScore {
    pub score: f32,
    pub image_image: f32,
    pub image_text: f32,
    pub text_image: f32,
    pub text_text: f32,
}

impl std::fmt::Display for PairScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4} (ii: {:.4}, it: {:.4}, ti: {:.4}, tt: {:.4})",
            self.score, self.image_image, self.image_text, self.text_image, self.text_text
        )
    }
}
