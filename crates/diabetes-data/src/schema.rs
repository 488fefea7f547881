//! The feature schema shared by training and inference.
//!
//! A model is only meaningful when the column order it was fitted on matches
//! the order of the vectors it is asked to score. [`Feature::ALL`] is that
//! order, and nothing else in the workspace keeps its own list of columns.
//!
//! Bump [`SCHEMA_VERSION`] whenever the order or set of features changes so
//! that artifacts written under the old layout are rejected on load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the feature layout below.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of input features.
pub const FEATURE_COUNT: usize = 8;

/// Name of the label column in the dataset.
pub const LABEL_COLUMN: &str = "Outcome";

/// One clinical input of the classifier.
///
/// Each feature has two names: the dataset column name (PascalCase, as in
/// the CSV header) and the wire name (camelCase, as in request bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl Feature {
    /// All features in training column order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Position of this feature in a [`FeatureVector`](crate::FeatureVector).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name in the dataset header.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    /// Field name in JSON request bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "pregnancies",
            Feature::Glucose => "glucose",
            Feature::BloodPressure => "bloodPressure",
            Feature::SkinThickness => "skinThickness",
            Feature::Insulin => "insulin",
            Feature::Bmi => "bmi",
            Feature::DiabetesPedigreeFunction => "diabetesPedigreeFunction",
            Feature::Age => "age",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Column names in training order, as owned strings.
pub fn feature_names() -> Vec<String> {
    Feature::ALL
        .iter()
        .map(|feature| feature.column_name().to_string())
        .collect()
}
