//! Breed classification boundary and the English → localized label table.

pub mod classifier;
pub mod error;
pub mod labels;
pub mod store;


pub use classifier::{BreedClassifier, ClassificationOutcome, StubBreedClassifier};
pub use error::{BreedError, ClassifierError};
pub use labels::{DEFAULT_BREED_LABELS, default_labels};
pub use store::{BreedMapping, BreedMappingStore};
