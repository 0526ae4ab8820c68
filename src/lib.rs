//! Dogmatch library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Caption normalization
//! - [`NormalizationPipeline`], [`RetryPolicy`] - prompt → generator → validator with
//!   retries and a deterministic fallback
//! - [`GenerativeTextGateway`], [`GeminiGateway`] - outbound text generation
//! - [`PromptBuilder`], [`ResponseValidator`], [`FallbackSentenceGenerator`]
//!
//! ## Similarity
//! - [`SimilarityScorer`], [`SimilarityWeights`], [`PairScore`]
//!
//! ## Breeds
//! - [`BreedMappingStore`] - English → localized label table
//! - [`BreedClassifier`], [`StubBreedClassifier`] - classification boundary
//!
//! ## Embedding
//! - [`ImageTextEmbedder`], [`StubEmbedder`]
//!
//! ## Test/Mock Support
//! [`MockTextGateway`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod breeds;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod image;
pub mod normalize;
pub mod similarity;

pub use breeds::{
    BreedClassifier, BreedError, BreedMapping, BreedMappingStore, ClassificationOutcome,
    ClassifierError, StubBreedClassifier,
};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, ImageTextEmbedder, StubEmbedder};
pub use gateway::{HandlerState, create_router_with_state};
pub use image::ImageFormat;
#[cfg(any(test, feature = "mock"))]
pub use normalize::MockTextGateway;
pub use normalize::{
    FallbackSentenceGenerator, GeminiGateway, GenerativeTextGateway, NormalizationError,
    NormalizationOutcome, NormalizationPipeline, NormalizationRequest, NormalizationResult,
    PipelineState, PromptBuilder, RawGenerativeResponse, ResponseValidator, RetryPolicy,
};
pub use similarity::{PairScore, SimilarityError, SimilarityScorer, SimilarityWeights};
