//! Model training: seeded holdout split, standardization, logistic fit and
//! held-out accuracy.
//!
//! # Example
//!
//! ```rust,ignore
//! use diabetes_data::DatasetLoader;
//! use diabetes_learning::{Trainer, TrainerConfig};
//!
//! let dataset = DatasetLoader::load("data/diabetes.csv")?;
//! let result = Trainer::new(TrainerConfig::default()).train(&dataset)?;
//! println!("accuracy = {:.3}", result.accuracy);
//! ```

use std::time::Instant;

use chrono::Utc;
use diabetes_data::{Dataset, FEATURE_COUNT, Outcome, Sample};
use linfa::traits::Fit;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::TrainerConfig;
use crate::error::LearningError;
use crate::model::{ModelMetadata, TrainedModel};
use crate::scaler::StandardScaler;
use crate::types::TrainingResult;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..rows` with a seeded RNG and hold out the first
/// `ceil(rows * test_size)` indices.
///
/// The same `(rows, test_size, seed)` always yields the same split.
pub fn train_test_split(rows: usize, test_size: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_rows = ((rows as f64) * test_size).ceil() as usize;
    let test_rows = test_rows.min(rows);
    let train = indices.split_off(test_rows);
    Split {
        train,
        test: indices,
    }
}

/// Fits [`TrainedModel`]s according to a [`TrainerConfig`].
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on `dataset` and score on its held-out partition.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::TrainingFailed`] if:
    /// - the dataset has fewer than 2 rows
    /// - either partition would be empty
    /// - fewer than 2 outcome classes are present overall or in the training partition
    /// - the solver fails or produces non-finite parameters
    pub fn train(&self, dataset: &Dataset) -> Result<TrainingResult, LearningError> {
        let start = Instant::now();

        if dataset.is_empty() {
            return Err(LearningError::TrainingFailed("dataset is empty".to_string()));
        }
        if dataset.len() < 2 {
            return Err(LearningError::TrainingFailed(format!(
                "dataset has {} row, at least 2 are required",
                dataset.len()
            )));
        }
        if dataset.class_count() < 2 {
            return Err(LearningError::TrainingFailed(
                "dataset contains only one outcome class".to_string(),
            ));
        }

        let split = train_test_split(
            dataset.len(),
            self.config.test_size,
            self.config.random_seed,
        );
        if split.train.is_empty() || split.test.is_empty() {
            return Err(LearningError::TrainingFailed(format!(
                "split of {} rows left an empty partition (train {}, test {})",
                dataset.len(),
                split.train.len(),
                split.test.len()
            )));
        }

        let samples = dataset.samples();
        let train: Vec<&Sample> = split.train.iter().map(|&i| &samples[i]).collect();
        let test: Vec<&Sample> = split.test.iter().map(|&i| &samples[i]).collect();

        if !has_both_classes(&train) {
            return Err(LearningError::TrainingFailed(
                "training partition contains only one outcome class".to_string(),
            ));
        }

        debug!(
            train_rows = train.len(),
            test_rows = test.len(),
            seed = self.config.random_seed,
            "Dataset split"
        );

        let scaler = StandardScaler::fit(train.iter().map(|s| &s.features));
        let (weights, intercept) = self.fit(&train, &scaler)?;

        let metadata = ModelMetadata {
            trained_at: Utc::now(),
            accuracy: None,
            train_rows: train.len(),
            test_rows: test.len(),
        };
        let mut model = TrainedModel::new(weights, intercept, scaler, metadata)?;

        let accuracy = accuracy(&model, &test);
        model.set_accuracy(accuracy);

        let training_time_seconds = start.elapsed().as_secs_f64();
        info!(
            accuracy,
            train_rows = train.len(),
            test_rows = test.len(),
            seconds = training_time_seconds,
            "Model trained"
        );

        Ok(TrainingResult {
            model,
            accuracy,
            train_rows: train.len(),
            test_rows: test.len(),
            training_time_seconds,
        })
    }

    /// Run the L-BFGS fit and return `(weights, intercept)` oriented so that
    /// a positive score means [`Outcome::Diabetes`].
    fn fit(
        &self,
        train: &[&Sample],
        scaler: &StandardScaler,
    ) -> Result<([f64; FEATURE_COUNT], f64), LearningError> {
        let mut records = Array2::<f64>::zeros((train.len(), FEATURE_COUNT));
        for (mut row, sample) in records.rows_mut().into_iter().zip(train) {
            for (cell, value) in row.iter_mut().zip(scaler.transform(&sample.features)) {
                *cell = value;
            }
        }
        let targets: Array1<usize> = train
            .iter()
            .map(|s| usize::from(s.outcome.as_u8()))
            .collect();

        let dataset = linfa::DatasetBase::new(records, targets);
        let fitted = LogisticRegression::default()
            .alpha(self.config.alpha)
            .max_iterations(self.config.max_iterations)
            .gradient_tolerance(self.config.gradient_tolerance)
            .fit(&dataset)
            .map_err(|e| LearningError::TrainingFailed(format!("solver error: {e}")))?;

        let params = fitted.params();
        if params.len() != FEATURE_COUNT {
            return Err(LearningError::TrainingFailed(format!(
                "solver returned {} weights (expected {FEATURE_COUNT})",
                params.len()
            )));
        }

        // linfa picks its own positive class; flip so that class 1 is positive.
        let sign = if fitted.labels().pos.class == usize::from(Outcome::Diabetes.as_u8()) {
            1.0
        } else {
            -1.0
        };
        let weights: [f64; FEATURE_COUNT] = std::array::from_fn(|j| sign * params[j]);
        let intercept = sign * fitted.intercept();

        if !weights.iter().all(|w| w.is_finite()) || !intercept.is_finite() {
            return Err(LearningError::TrainingFailed(
                "solver produced non-finite parameters".to_string(),
            ));
        }
        Ok((weights, intercept))
    }
}

fn has_both_classes(rows: &[&Sample]) -> bool {
    let positives = rows
        .iter()
        .filter(|s| s.outcome == Outcome::Diabetes)
        .count();
    positives > 0 && positives < rows.len()
}

/// Fraction of `rows` the model classifies correctly.
fn accuracy(model: &TrainedModel, rows: &[&Sample]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let correct = rows
        .iter()
        .filter(|s| model.predict(&s.features).outcome == s.outcome)
        .count();
    correct as f64 / rows.len() as f64
}
