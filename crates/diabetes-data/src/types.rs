//! Core data types: feature vectors, outcomes, and the loaded dataset.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{FEATURE_COUNT, Feature};

// =============================================================================
// Feature vector
// =============================================================================

/// One patient's inputs, in [`Feature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap values that are already in schema order.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Value of a single feature.
    #[inline]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Raw values in schema order.
    #[inline]
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::new(values)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The binary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    NoDiabetes = 0,
    Diabetes = 1,
}

impl Outcome {
    /// Numeric class as stored in the dataset.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// User-facing label. These strings are shown verbatim to end users.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::NoDiabetes => "Tidak Diabetes",
            Outcome::Diabetes => "Diabetes",
        }
    }

    /// Parse a label cell. Only exact 0 and 1 are accepted.
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::NoDiabetes)
        } else if value == 1.0 {
            Some(Outcome::Diabetes)
        } else {
            None
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// A single labelled row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: FeatureVector,
    pub outcome: Outcome,
}

/// Labelled rows in file order. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Number of rows per outcome, as `(no_diabetes, diabetes)`.
    pub fn class_counts(&self) -> (usize, usize) {
        self.samples
            .iter()
            .fold((0, 0), |(neg, pos), sample| match sample.outcome {
                Outcome::NoDiabetes => (neg + 1, pos),
                Outcome::Diabetes => (neg, pos + 1),
            })
    }

    /// Number of distinct outcomes present.
    pub fn class_count(&self) -> usize {
        let (neg, pos) = self.class_counts();
        usize::from(neg > 0) + usize::from(pos > 0)
    }
}
