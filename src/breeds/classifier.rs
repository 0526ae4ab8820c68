//! Breed classification collaborator boundary.
//!
//! The detection/classification models live outside this crate. [`BreedClassifier`] is
//! the seam; [`StubBreedClassifier`] is a deterministic stand-in that needs no model
//! files.

use tracing::{debug, warn};

use super::error::ClassifierError;
use super::labels::default_labels;
use crate::hashing::hash_with_domain;
use crate::image::ImageFormat;

/// Result of classifying one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    /// English label of the top breed.
    Breed(String),
    /// The detector found no dog in the image.
    NoDetection,
}

/// Image → breed classifier. Calls are CPU-bound and blocking; run them on a blocking
/// thread.
pub trait BreedClassifier: Send + Sync {
    /// Loads weights and runs a warmup pass. Called once before serving.
    fn warmup(&self) -> Result<(), ClassifierError>;

    /// English labels in output order, each with its localized name (blank if none).
    fn labels(&self) -> Vec<(String, String)>;

    fn classify(&self, image: &[u8]) -> Result<ClassificationOutcome, ClassifierError>;

    fn is_stub(&self) -> bool {
        false
    }
}

/// Deterministic classifier keyed on the image bytes.
///
/// Any recognized image container yields a breed picked from the label table by a
/// BLAKE3 fingerprint of the bytes, so the same upload always gets the same answer.
#[derive(Debug, Clone)]
pub struct StubBreedClassifier {
    labels: Vec<(String, String)>,
    detect: bool,
}

impl Default for StubBreedClassifier {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            detect: true,
        }
    }
}

impl StubBreedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(labels: Vec<(String, String)>) -> Self {
        Self {
            labels,
            detect: true,
        }
    }

    /// A classifier whose detector never finds a dog.
    pub fn without_detection() -> Self {
        Self {
            detect: false,
            ..Self::default()
        }
    }
}

impl BreedClassifier for StubBreedClassifier {
    fn warmup(&self) -> Result<(), ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::WarmupFailed {
                reason: "label table is empty".to_string(),
            });
        }
        warn!(labels = self.labels.len(), "breed classifier running in STUB mode");
        Ok(())
    }

    fn labels(&self) -> Vec<(String, String)> {
        self.labels.clone()
    }

    fn classify(&self, image: &[u8]) -> Result<ClassificationOutcome, ClassifierError> {
        let format = ImageFormat::sniff(image).ok_or_else(|| ClassifierError::InvalidImage {
            reason: "unrecognized image format".to_string(),
        })?;

        if !self.detect {
            debug!(format = format.mime_type(), "stub detector found no dog");
            return Ok(ClassificationOutcome::NoDetection);
        }

        let seed = hash_with_domain("breed", image);
        let index = (seed % self.labels.len().max(1) as u64) as usize;
        let (en, _) = self
            .labels
            .get(index)
            .ok_or_else(|| ClassifierError::InferenceFailed {
                reason: "label table is empty".to_string(),
            })?;

        debug!(format = format.mime_type(), breed = %en, "stub classification");
        Ok(ClassificationOutcome::Breed(en.clone()))
    }

    fn is_stub(&self) -> bool {
        true
    }
}
