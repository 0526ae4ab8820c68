use std::sync::Arc;

use crate::breeds::{BreedClassifier, BreedMappingStore};
use crate::embedding::ImageTextEmbedder;
use crate::normalize::NormalizationPipeline;
use crate::similarity::SimilarityScorer;

/// Shared handler state. Every field is cheap to clone.
#[derive(Clone)]
pub struct HandlerState {
    pub pipeline: Arc<NormalizationPipeline>,

    pub scorer: Arc<SimilarityScorer>,

    pub breeds: BreedMappingStore,

    pub classifier: Arc<dyn BreedClassifier>,

    pub embedder: Arc<dyn ImageTextEmbedder>,

    /// Rendered by `/dogbreed` when classification yields no breed.
    pub mix_label: Arc<str>,
}

impl HandlerState {
    pub fn new(
        pipeline: Arc<NormalizationPipeline>,
        scorer: Arc<SimilarityScorer>,
        breeds: BreedMappingStore,
        classifier: Arc<dyn BreedClassifier>,
        embedder: Arc<dyn ImageTextEmbedder>,
        mix_label: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            pipeline,
            scorer,
            breeds,
            classifier,
            embedder,
            mix_label: mix_label.into(),
        }
    }
}
