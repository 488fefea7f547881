//! Error types for the diabetes-learning crate.
//!
//! This module defines [`LearningError`], the error type returned by every
//! public function in the crate.
//!
//! # Error Handling
//!
//! Errors fall into three groups:
//! - **Configuration**: [`InvalidConfig`](LearningError::InvalidConfig)
//! - **Training**: [`TrainingFailed`](LearningError::TrainingFailed) and
//!   [`Data`](LearningError::Data) for problems reading the dataset
//! - **Artifacts**: [`ArtifactNotFound`](LearningError::ArtifactNotFound),
//!   [`CorruptArtifact`](LearningError::CorruptArtifact) and [`Io`](LearningError::Io)
//!
//! # Example
//!
//! ```no_run
//! use diabetes_learning::{LearningError, ModelStore};
//!
//! fn load() -> Result<(), LearningError> {
//!     let store = ModelStore::new("diabetes_model.json");
//!     match store.load() {
//!         Ok(model) => println!("loaded model trained at {}", model.metadata().trained_at),
//!         Err(err) if err.is_artifact_not_found() => println!("first run"),
//!         Err(err) => return Err(err),
//!     }
//!     Ok(())
//! }
//! ```

use diabetes_data::DataError;
use thiserror::Error;

/// The main error type for diabetes-learning operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid trainer configuration.
    ///
    /// Check the message for the offending setting and its accepted range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dataset could not be loaded or typed.
    #[error("Dataset error: {0}")]
    Data(#[from] DataError),

    /// Fitting the classifier failed.
    ///
    /// Common causes:
    /// - The dataset is empty or too small to split
    /// - Only one outcome class is present
    /// - The solver diverged and produced non-finite parameters
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// No artifact exists at the given path.
    ///
    /// On startup this is the normal first-run signal, not a failure.
    #[error("Model artifact not found: {path}")]
    ArtifactNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The artifact exists but does not describe a valid model.
    ///
    /// Truncated files, malformed JSON, a format or schema version this
    /// build does not understand, and non-finite parameters all land here.
    #[error("Corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// I/O error while writing or reading an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LearningError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Data(err) => err.error_code(),
            Self::TrainingFailed(_) => "TRAINING_FAILED",
            Self::ArtifactNotFound { .. } => "ARTIFACT_NOT_FOUND",
            Self::CorruptArtifact(_) => "CORRUPT_ARTIFACT",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Whether this is the "no artifact yet" signal.
    pub fn is_artifact_not_found(&self) -> bool {
        matches!(self, Self::ArtifactNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LearningError::TrainingFailed("x".to_string()).error_code(),
            "TRAINING_FAILED"
        );
        assert_eq!(
            LearningError::CorruptArtifact("x".to_string()).error_code(),
            "CORRUPT_ARTIFACT"
        );
        assert_eq!(
            LearningError::from(DataError::MissingColumn("Age".to_string())).error_code(),
            "MISSING_COLUMN"
        );
    }

    #[test]
    fn test_is_artifact_not_found() {
        let err = LearningError::ArtifactNotFound {
            path: "model.json".to_string(),
        };
        assert!(err.is_artifact_not_found());
        assert!(err.to_string().contains("model.json"));
        assert!(!LearningError::CorruptArtifact("x".to_string()).is_artifact_not_found());
    }
}
