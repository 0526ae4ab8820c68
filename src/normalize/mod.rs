//! Caption normalization: free-form breed/color/feature text to three fixed-shape
//! English sentences suitable for CLIP text encoding.

pub mod error;
pub mod fallback;
pub mod gateway;
pub mod pipeline;
pub mod prompt;
pub mod types;
pub mod validator;
pub mod vocabulary;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::NormalizationError;
pub use fallback::{FALLBACK_SENTENCES, FallbackSentenceGenerator};
pub use gateway::{GeminiGateway, GenerativeTextGateway};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockTextGateway};
pub use pipeline::{NormalizationPipeline, RetryPolicy};
pub use prompt::PromptBuilder;
pub use types::{
    GenerateContentRequest, NormalizationOutcome, NormalizationRequest, NormalizationResult,
    PipelineState, RawGenerativeResponse,
};
pub use validator::ResponseValidator;
pub use vocabulary::{CoatColor, EXTENDED_COLORS, Temperament};
