//! Result types returned by the trainer and the model.
//!
//! # Overview
//!
//! - [`TrainingResult`]: output of [`Trainer::train()`](crate::Trainer::train)
//! - [`Prediction`]: output of [`TrainedModel::predict()`](crate::TrainedModel::predict)
//! - [`ClassProbabilities`]: the two-class probability pair inside a prediction

use diabetes_data::Outcome;
use serde::{Deserialize, Serialize};

use crate::model::TrainedModel;

/// Result of a training run.
///
/// The model carries its own [`ModelMetadata`](crate::ModelMetadata); the
/// fields here duplicate the figures callers most often want without reaching
/// through it.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TrainingResult {
    /// The fitted model, ready to serve.
    pub model: TrainedModel,

    /// Fraction of the held-out partition classified correctly, in `[0, 1]`.
    pub accuracy: f64,

    /// Rows used to fit the model.
    pub train_rows: usize,

    /// Rows held out for accuracy.
    pub test_rows: usize,

    /// Wall-clock time spent splitting, fitting and scoring.
    pub training_time_seconds: f64,
}

/// Probability of each outcome. The two values sum to 1 within float
/// tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub no_diabetes: f64,
    pub diabetes: f64,
}

impl ClassProbabilities {
    /// Build the pair from the positive-class probability.
    pub fn from_positive(diabetes: f64) -> Self {
        Self {
            no_diabetes: 1.0 - diabetes,
            diabetes,
        }
    }

    /// The larger of the two probabilities.
    pub fn max(&self) -> f64 {
        self.no_diabetes.max(self.diabetes)
    }

    /// Probability assigned to a given outcome.
    pub fn of(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::NoDiabetes => self.no_diabetes,
            Outcome::Diabetes => self.diabetes,
        }
    }
}

/// A single-row prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class.
    pub outcome: Outcome,

    /// Per-class probabilities.
    pub probabilities: ClassProbabilities,

    /// Probability of the predicted class. Always equals
    /// `probabilities.max()`.
    pub confidence: f64,
}

impl Prediction {
    pub(crate) fn from_probabilities(probabilities: ClassProbabilities, outcome: Outcome) -> Self {
        Self {
            outcome,
            probabilities,
            confidence: probabilities.of(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_from_positive() {
        let probs = ClassProbabilities::from_positive(0.8);
        assert!((probs.no_diabetes - 0.2).abs() < 1e-12);
        assert_eq!(probs.diabetes, 0.8);
        assert_eq!(probs.max(), 0.8);
        assert_eq!(probs.of(Outcome::NoDiabetes), probs.no_diabetes);
    }

    #[test]
    fn test_prediction_confidence_matches_class() {
        let probs = ClassProbabilities::from_positive(0.3);
        let prediction = Prediction::from_probabilities(probs, Outcome::NoDiabetes);
        assert_eq!(prediction.confidence, probs.max());
    }
}
