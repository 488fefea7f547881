//! Configuration for the model trainer.
//!
//! # Example
//!
//! ```
//! use diabetes_learning::TrainerConfig;
//!
//! let config = TrainerConfig::builder()
//!     .test_size(0.25)
//!     .random_seed(0)
//!     .build()
//!     .expect("valid config");
//! ```

use crate::error::LearningError;

/// Configuration for [`Trainer`](crate::Trainer).
///
/// Use [`TrainerConfig::builder()`] to construct a validated configuration.
/// The defaults reproduce the service's fixed training recipe: a 25% holdout
/// drawn with seed 0.
///
/// # Validation
///
/// [`build()`](TrainerConfigBuilder::build) checks that:
/// - `test_size` is in range `(0.0, 1.0)` (exclusive)
/// - `max_iterations` is at least 1
/// - `alpha` is finite and non-negative
/// - `gradient_tolerance` is finite and positive
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Fraction of rows held out for accuracy (default: 0.25).
    ///
    /// The test partition has `ceil(rows * test_size)` rows.
    pub test_size: f64,

    /// Seed for the train/test shuffle (default: 0).
    ///
    /// The same seed on the same data gives the same split.
    pub random_seed: u64,

    /// L2 regularization strength (default: 1.0).
    pub alpha: f64,

    /// Iteration cap for the L-BFGS solver (default: 100).
    pub max_iterations: u64,

    /// Gradient norm at which the solver stops (default: 1e-4).
    pub gradient_tolerance: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            random_seed: 0,
            alpha: 1.0,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
        }
    }
}

impl TrainerConfig {
    /// Create a new builder for `TrainerConfig`.
    #[must_use]
    pub fn builder() -> TrainerConfigBuilder {
        TrainerConfigBuilder::default()
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainerConfigBuilder {
    config: TrainerConfig,
}

impl TrainerConfigBuilder {
    /// Set the holdout fraction (default: 0.25).
    #[must_use]
    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    /// Set the shuffle seed (default: 0).
    #[must_use]
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Set the L2 regularization strength (default: 1.0).
    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Set the solver iteration cap (default: 100).
    #[must_use]
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.config.max_iterations = iterations;
        self
    }

    /// Set the solver gradient tolerance (default: 1e-4).
    #[must_use]
    pub fn gradient_tolerance(mut self, tolerance: f64) -> Self {
        self.config.gradient_tolerance = tolerance;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] naming the first invalid setting.
    pub fn build(self) -> Result<TrainerConfig, LearningError> {
        let config = self.config;

        if !(config.test_size > 0.0 && config.test_size < 1.0) {
            return Err(LearningError::InvalidConfig(
                "test_size must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if config.max_iterations == 0 {
            return Err(LearningError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        if !config.alpha.is_finite() || config.alpha < 0.0 {
            return Err(LearningError::InvalidConfig(
                "alpha must be a finite, non-negative number".to_string(),
            ));
        }

        if !config.gradient_tolerance.is_finite() || config.gradient_tolerance <= 0.0 {
            return Err(LearningError::InvalidConfig(
                "gradient_tolerance must be a finite, positive number".to_string(),
            ));
        }

        Ok(config)
    }
}
