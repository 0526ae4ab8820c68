use super::types::NormalizationResult;

pub const FALLBACK_SENTENCES: [&str; 3] = [
    "An unknown dog with unknown colors.",
    "Appearance summary: Unknown dog with unknown coat.",
    "Unknown; colors: unknown.",
];

/// Placeholder sentences used once every generation attempt has failed.
///
/// Independent of the request so identical failures always embed identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSentenceGenerator;

impl FallbackSentenceGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> NormalizationResult {
        NormalizationResult::from_static(FALLBACK_SENTENCES)
    }
}
