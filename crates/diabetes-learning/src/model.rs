//! Trained model for inference and serialization.
//!
//! This module provides [`TrainedModel`], the fitted logistic classifier:
//!
//! - **Single-row prediction** via [`predict()`](TrainedModel::predict)
//! - **Serialization** via [`to_bytes()`](TrainedModel::to_bytes) and
//!   [`from_bytes()`](TrainedModel::from_bytes); file persistence lives in
//!   [`ModelStore`](crate::ModelStore)
//! - **Introspection** via [`metadata()`](TrainedModel::metadata),
//!   [`weights()`](TrainedModel::weights) and [`intercept()`](TrainedModel::intercept)
//!
//! # Lifecycle
//!
//! A `TrainedModel` is created in one of two ways:
//!
//! 1. **From training**: [`Trainer::train()`](crate::Trainer::train) returns one
//!    inside its [`TrainingResult`](crate::TrainingResult)
//! 2. **From an artifact**: [`ModelStore::load()`](crate::ModelStore::load) or
//!    [`TrainedModel::from_bytes()`]
//!
//! # Artifact format
//!
//! The artifact is a single JSON document carrying a format version, the
//! feature schema version and names, the weights and intercept, the
//! standardization state, and [`ModelMetadata`]. Loading rejects anything that
//! does not describe a model this build can serve.
//!
//! # Thread Safety
//!
//! `TrainedModel` is plain data and is `Send + Sync`. Prediction takes `&self`
//! and never mutates, so one instance can be shared behind an `Arc`.

use chrono::{DateTime, Utc};
use diabetes_data::{FEATURE_COUNT, FeatureVector, Outcome, SCHEMA_VERSION, feature_names};
use serde::{Deserialize, Serialize};

use crate::error::LearningError;
use crate::scaler::StandardScaler;
use crate::types::{ClassProbabilities, Prediction};

/// Model type reported to clients.
pub const MODEL_TYPE: &str = "Logistic Regression";

/// Version of the on-disk artifact layout.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Facts about how a model was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// When training finished.
    pub trained_at: DateTime<Utc>,

    /// Held-out accuracy measured when the model was trained.
    ///
    /// `None` for artifacts written without one.
    pub accuracy: Option<f64>,

    /// Rows used to fit the model.
    pub train_rows: usize,

    /// Rows held out for accuracy.
    pub test_rows: usize,
}

/// A fitted logistic classifier over the 8 schema features.
///
/// The decision function is `intercept + Σ weights[j] * z[j]` where `z` is
/// the standardized feature vector. `P(Outcome = 1)` is its sigmoid.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
    scaler: StandardScaler,
    metadata: ModelMetadata,
}

impl TrainedModel {
    /// Assemble a model from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::TrainingFailed`] if any weight or the
    /// intercept is not finite.
    pub fn new(
        weights: [f64; FEATURE_COUNT],
        intercept: f64,
        scaler: StandardScaler,
        metadata: ModelMetadata,
    ) -> Result<Self, LearningError> {
        if !weights.iter().all(|w| w.is_finite()) || !intercept.is_finite() {
            return Err(LearningError::TrainingFailed(
                "solver produced non-finite parameters".to_string(),
            ));
        }
        Ok(Self {
            weights,
            intercept,
            scaler,
            metadata,
        })
    }

    pub fn weights(&self) -> &[f64; FEATURE_COUNT] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Held-out accuracy recorded for this model, if any.
    pub fn accuracy(&self) -> Option<f64> {
        self.metadata.accuracy
    }

    pub(crate) fn set_accuracy(&mut self, accuracy: f64) {
        self.metadata.accuracy = Some(accuracy);
    }

    /// Raw linear score. Positive means the diabetes class.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        let scaled = self.scaler.transform(features);
        scaled
            .iter()
            .zip(self.weights.iter())
            .fold(self.intercept, |acc, (z, w)| acc + z * w)
    }

    /// Probability of each outcome for one row.
    pub fn predict_probability(&self, features: &FeatureVector) -> ClassProbabilities {
        ClassProbabilities::from_positive(sigmoid(self.decision_function(features)))
    }

    /// Classify one row.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let score = self.decision_function(features);
        let outcome = if score > 0.0 {
            Outcome::Diabetes
        } else {
            Outcome::NoDiabetes
        };
        Prediction::from_probabilities(ClassProbabilities::from_positive(sigmoid(score)), outcome)
    }

    /// Serialize to the JSON artifact format.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::CorruptArtifact`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LearningError> {
        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            schema_version: SCHEMA_VERSION,
            model_type: MODEL_TYPE.to_string(),
            features: feature_names(),
            weights: self.weights.to_vec(),
            intercept: self.intercept,
            scaler_mean: self.scaler.mean().to_vec(),
            scaler_scale: self.scaler.scale().to_vec(),
            metadata: self.metadata.clone(),
        };
        serde_json::to_vec_pretty(&artifact)
            .map_err(|e| LearningError::CorruptArtifact(format!("failed to serialize model: {e}")))
    }

    /// Deserialize and validate a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::CorruptArtifact`] if the bytes are not valid
    /// JSON, the format or schema version differs from this build, the
    /// feature list does not match the schema, or any parameter is not finite.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LearningError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| LearningError::CorruptArtifact(format!("invalid JSON: {e}")))?;
        artifact.into_model()
    }
}

/// On-disk layout. Vectors rather than arrays so a wrong length is reported
/// as a validation failure with a useful message.
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    schema_version: u32,
    model_type: String,
    features: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
    scaler_mean: Vec<f64>,
    scaler_scale: Vec<f64>,
    metadata: ModelMetadata,
}

impl ModelArtifact {
    fn into_model(self) -> Result<TrainedModel, LearningError> {
        let corrupt = |msg: String| LearningError::CorruptArtifact(msg);

        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                self.format_version
            )));
        }
        if self.schema_version != SCHEMA_VERSION {
            return Err(corrupt(format!(
                "schema version {} does not match {SCHEMA_VERSION}",
                self.schema_version
            )));
        }
        if self.model_type != MODEL_TYPE {
            return Err(corrupt(format!("unknown model type '{}'", self.model_type)));
        }
        if self.features != feature_names() {
            return Err(corrupt(format!(
                "feature list {:?} does not match the schema",
                self.features
            )));
        }

        let weights = to_array("weights", self.weights)?;
        let mean = to_array("scaler_mean", self.scaler_mean)?;
        let scale = to_array("scaler_scale", self.scaler_scale)?;
        let scaler = StandardScaler::from_parts(mean, scale)
            .ok_or_else(|| corrupt("invalid standardization parameters".to_string()))?;

        if let Some(accuracy) = self.metadata.accuracy.filter(|a| !(0.0..=1.0).contains(a)) {
            return Err(corrupt(format!("accuracy {accuracy} is outside [0, 1]")));
        }

        TrainedModel::new(weights, self.intercept, scaler, self.metadata)
            .map_err(|_| corrupt("non-finite model parameters".to_string()))
    }
}

fn to_array(field: &str, values: Vec<f64>) -> Result<[f64; FEATURE_COUNT], LearningError> {
    let len = values.len();
    <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| {
        LearningError::CorruptArtifact(format!(
            "{field} has {len} values (expected {FEATURE_COUNT})"
        ))
    })
}

/// Logistic function, evaluated so that neither branch overflows.
#[inline]
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
