use serde::{Deserialize, Serialize};

use crate::breeds::BreedMapping;
use crate::normalize::NormalizationResult;
use crate::similarity::SimilarityWeights;

#[derive(Debug, Serialize, Deserialize)]
pub struct DogBreedResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub sentences: NormalizationResult,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub sentences: NormalizationResult,
    pub image: Vec<f32>,
    pub text: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairScoreRequest {
    pub emb_a_image: Vec<f32>,
    pub emb_a_text: Vec<f32>,
    pub emb_b_image: Vec<f32>,
    pub emb_b_text: Vec<f32>,
    /// Per-call override of the configured weights.
    #[serde(default)]
    pub weights: Option<SimilarityWeights>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PairScoreResponse {
    pub score: f32,
}

#[derive(Debug, Serialize)]
pub struct BreedMappingList {
    pub mappings: Vec<BreedMapping>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BreedMappingUpdateResponse {
    pub success: bool,
    pub message: String,
}
