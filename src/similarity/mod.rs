//! Cross-modal similarity between two posts.
//!
//! Each post carries an image embedding and a text embedding. The four cosine
//! similarities (image/image, image/text, text/image, text/text) are combined with
//! [`SimilarityWeights`]. Each component is clamped to `[-1, 1]`, so with non-negative
//! weights the score is bounded by `±sum(weights)`.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::SimilarityError;
pub use scorer::{SimilarityScorer, cosine_similarity};
pub use types::{PairScore, SimilarityWeights};
