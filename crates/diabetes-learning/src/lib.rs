//! diabetes-learning: logistic regression training, inference and artifact
//! storage for the diabetes risk classifier.
//!
//! # Features
//!
//! - **Deterministic training**: seeded holdout split, per-feature
//!   standardization and an L2-regularized L-BFGS fit via `linfa-logistic`
//! - **Self-contained inference**: a [`TrainedModel`] is plain data, so
//!   prediction needs no solver state and runs lock-free behind an `Arc`
//! - **Validated artifacts**: models persist as versioned JSON with exact
//!   float round-tripping
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use diabetes_data::{DatasetLoader, FeatureVector};
//! use diabetes_learning::{ModelStore, Trainer, TrainerConfig};
//!
//! let dataset = DatasetLoader::load("data/diabetes.csv")?;
//!
//! let config = TrainerConfig::builder()
//!     .test_size(0.25)
//!     .random_seed(0)
//!     .build()?;
//! let result = Trainer::new(config).train(&dataset)?;
//! println!("held-out accuracy: {:.3}", result.accuracy);
//!
//! let store = ModelStore::new("diabetes_model.json");
//! store.save(&result.model)?;
//!
//! let model = store.load()?;
//! let prediction = model.predict(&FeatureVector::new([
//!     6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0,
//! ]));
//! println!("{} ({:.1}%)", prediction.outcome, prediction.confidence * 100.0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Dataset ──► Trainer ──► TrainingResult { model, accuracy }
//!                              │
//!                              ▼
//!                         TrainedModel ◄──► ModelStore (JSON artifact)
//!                              │
//!                              ▼
//!                          Prediction
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LearningError>`]:
//!
//! - [`LearningError::InvalidConfig`] - Invalid trainer configuration
//! - [`LearningError::Data`] - The dataset could not be loaded
//! - [`LearningError::TrainingFailed`] - Fitting failed
//! - [`LearningError::ArtifactNotFound`] - No artifact on disk yet
//! - [`LearningError::CorruptArtifact`] - The artifact is unusable
//!
//! See [`LearningError`] for the complete list.

mod config;
mod error;
mod model;
mod scaler;
mod store;
mod trainer;
mod types;

// Re-export public API
//
// Configuration types
pub use config::{TrainerConfig, TrainerConfigBuilder};
// Error types
pub use error::LearningError;
// Model types
pub use model::{ARTIFACT_FORMAT_VERSION, MODEL_TYPE, ModelMetadata, TrainedModel};
pub use scaler::StandardScaler;
// Persistence
pub use store::ModelStore;
// Training
pub use trainer::{Split, Trainer, train_test_split};
// Result types
pub use types::{ClassProbabilities, Prediction, TrainingResult};

// Models are shared across request handlers behind an Arc.
static_assertions::assert_impl_all!(TrainedModel: Send, Sync);
static_assertions::assert_impl_all!(ModelStore: Send, Sync);
