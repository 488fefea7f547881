//! Model lifecycle management
//!
//! [`ModelManager`] owns the one model the service answers with.
//!
//! # States
//!
//! ```text
//!                 initialize() ok
//! Uninitialized ─────────────────► Ready ◄──┐
//!       │                            │      │ retrain() ok: swap
//!       │ initialize() failed        └──────┘
//!       ▼
//!    Failed (terminal)
//! ```
//!
//! # Concurrency
//!
//! The state lives behind one `parking_lot::RwLock`. Readers hold the lock
//! only long enough to clone an `Arc<ActiveModel>`, then predict on that
//! snapshot without any lock, so a request sees exactly one model together
//! with the accuracy measured for it. Training runs without locks; the
//! artifact write and the swap happen under a separate publish mutex, so the
//! artifact on disk always matches the model being served.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use diabetes_data::{DatasetLoader, feature_names};
use diabetes_learning::{
    ClassProbabilities, LearningError, MODEL_TYPE, ModelStore, TrainedModel, Trainer,
    TrainingResult,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::input::parse_features;

// ============================================================================
// STATE
// ============================================================================

/// A model together with the accuracy measured for it.
///
/// Never mutated after construction. A retrain builds a new one.
#[derive(Debug)]
pub struct ActiveModel {
    pub model: TrainedModel,
    pub accuracy: Option<f64>,
    /// Increases by one with every successful load or retrain.
    pub generation: u64,
}

#[derive(Debug)]
enum ProcessState {
    Uninitialized,
    Ready(Arc<ActiveModel>),
    Failed(String),
}

/// Coarse lifecycle state, as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Uninitialized,
    Ready,
    Failed,
}

impl ModelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Body of a successful `/api/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Predicted class, 0 or 1.
    pub prediction: u8,
    pub prediction_text: &'static str,
    pub probability: ClassProbabilities,
    pub confidence: f64,
    pub model_accuracy: Option<f64>,
    /// Generation of the model that answered.
    #[serde(skip)]
    pub generation: u64,
}

/// Body of `/api/model-info`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub accuracy: Option<f64>,
    pub features: Vec<String>,
    pub status: &'static str,
}

/// Outcome of a successful retrain.
#[derive(Debug, Clone, Copy)]
pub struct RetrainOutcome {
    pub accuracy: f64,
    pub generation: u64,
}

// ============================================================================
// MANAGER
// ============================================================================

pub struct ModelManager {
    state: RwLock<ProcessState>,
    /// Last published generation. Held while writing the artifact and
    /// swapping the model.
    publish: Mutex<u64>,
    store: ModelStore,
    dataset_path: PathBuf,
    trainer: Trainer,
}

impl ModelManager {
    pub fn new(store: ModelStore, dataset_path: impl Into<PathBuf>, trainer: Trainer) -> Self {
        Self {
            state: RwLock::new(ProcessState::Uninitialized),
            publish: Mutex::new(0),
            store,
            dataset_path: dataset_path.into(),
            trainer,
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn status(&self) -> ModelStatus {
        match &*self.state.read() {
            ProcessState::Uninitialized => ModelStatus::Uninitialized,
            ProcessState::Ready(_) => ModelStatus::Ready,
            ProcessState::Failed(_) => ModelStatus::Failed,
        }
    }

    /// The model currently being served, if any.
    pub fn snapshot(&self) -> Option<Arc<ActiveModel>> {
        match &*self.state.read() {
            ProcessState::Ready(active) => Some(Arc::clone(active)),
            _ => None,
        }
    }

    /// Load the saved model, or train and save one if there is none or it is
    /// unusable.
    ///
    /// Calling this on a ready manager does nothing. Calling it after a
    /// failure returns the same failure again.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InitializationFailed`] if the fallback
    /// training or the artifact write fails. The manager is then `Failed`.
    pub fn initialize(&self) -> ServiceResult<()> {
        let mut generation = self.publish.lock();

        match &*self.state.read() {
            ProcessState::Ready(_) => return Ok(()),
            ProcessState::Failed(reason) => {
                return Err(ServiceError::InitializationFailed(reason.clone()));
            }
            ProcessState::Uninitialized => {}
        }

        let model = match self.store.load() {
            Ok(model) => {
                info!(
                    path = %self.store.path().display(),
                    accuracy = ?model.accuracy(),
                    "Saved model loaded"
                );
                model
            }
            Err(err) => {
                if err.is_artifact_not_found() {
                    info!(
                        "No saved model at {}, training from {}",
                        self.store.path().display(),
                        self.dataset_path.display()
                    );
                } else {
                    warn!(error = %err, "Saved model is unusable, retraining");
                }

                match self.train_and_save() {
                    Ok(model) => model,
                    Err(err) => {
                        let reason = err.to_string();
                        error!(code = err.error_code(), "Model initialization failed: {reason}");
                        *self.state.write() = ProcessState::Failed(reason.clone());
                        return Err(ServiceError::InitializationFailed(reason));
                    }
                }
            }
        };

        self.publish_model(&mut generation, model);
        Ok(())
    }

    /// Classify one raw request body with the current model.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::ModelUnavailable`] unless the manager is ready
    /// - [`ServiceError::MissingField`], [`ServiceError::InvalidInput`] or
    ///   [`ServiceError::InvalidBody`] for a bad body
    pub fn predict(&self, body: &Value) -> ServiceResult<PredictionResult> {
        let active = self.snapshot().ok_or(ServiceError::ModelUnavailable)?;
        let features = parse_features(body)?;
        let prediction = active.model.predict(&features);

        debug!(
            generation = active.generation,
            outcome = prediction.outcome.as_u8(),
            confidence = prediction.confidence,
            "Prediction served"
        );

        Ok(PredictionResult {
            prediction: prediction.outcome.as_u8(),
            prediction_text: prediction.outcome.label(),
            probability: prediction.probabilities,
            confidence: prediction.confidence,
            model_accuracy: active.accuracy,
            generation: active.generation,
        })
    }

    /// Describe the current model.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ModelUnavailable`] unless the manager is ready.
    pub fn info(&self) -> ServiceResult<ModelInfo> {
        let active = self.snapshot().ok_or(ServiceError::ModelUnavailable)?;
        Ok(ModelInfo {
            model_type: MODEL_TYPE,
            accuracy: active.accuracy,
            features: feature_names(),
            status: ModelStatus::Ready.as_str(),
        })
    }

    /// Reload the dataset, train a new model, save it, and swap it in.
    ///
    /// On failure the previous model keeps serving. Blocks for the duration
    /// of training; call from a blocking context.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::ModelUnavailable`] unless the manager is ready
    /// - [`ServiceError::Training`] if loading, fitting or saving fails
    pub fn retrain(&self) -> ServiceResult<RetrainOutcome> {
        if self.snapshot().is_none() {
            return Err(ServiceError::ModelUnavailable);
        }

        let result = self.train().inspect_err(|err| {
            error!(code = err.error_code(), "Retraining failed, keeping current model: {err}");
        })?;

        let mut generation = self.publish.lock();
        if let Err(err) = self.store.save(&result.model) {
            error!(code = err.error_code(), "Saving retrained model failed: {err}");
            return Err(err.into());
        }
        let active = self.publish_model(&mut generation, result.model);

        info!(
            generation = active.generation,
            accuracy = result.accuracy,
            "Retrained model is now serving"
        );
        Ok(RetrainOutcome {
            accuracy: result.accuracy,
            generation: active.generation,
        })
    }

    fn train(&self) -> Result<TrainingResult, LearningError> {
        let dataset = DatasetLoader::load(&self.dataset_path)?;
        self.trainer.train(&dataset)
    }

    fn train_and_save(&self) -> Result<TrainedModel, LearningError> {
        let result = self.train()?;
        self.store.save(&result.model)?;
        Ok(result.model)
    }

    /// Swap in a new model. The caller holds the publish lock.
    fn publish_model(&self, generation: &mut u64, model: TrainedModel) -> Arc<ActiveModel> {
        *generation += 1;
        let active = Arc::new(ActiveModel {
            accuracy: model.accuracy(),
            model,
            generation: *generation,
        });
        *self.state.write() = ProcessState::Ready(Arc::clone(&active));
        active
    }
}
