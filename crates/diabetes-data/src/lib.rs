//! Feature schema and dataset loading for the diabetes risk classifier.
//!
//! # Overview
//!
//! - [`schema`]: the ordered, versioned list of the 8 clinical features and
//!   the label column. Training and inference both index through it.
//! - [`DatasetLoader`]: reads the CSV dataset with Polars and selects the
//!   schema columns by name.
//! - [`Dataset`], [`FeatureVector`], [`Outcome`]: the typed rows.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use diabetes_data::{DatasetLoader, Feature};
//!
//! let dataset = DatasetLoader::load("data/diabetes.csv")?;
//! let first = &dataset.samples()[0];
//! println!("glucose = {}", first.features.get(Feature::Glucose));
//! println!("outcome = {}", first.outcome);
//! ```

pub mod error;
pub mod loader;
pub mod schema;
pub mod types;

// Re-exports for convenient access
pub use error::{DataError, Result as DataResult};
pub use loader::DatasetLoader;
pub use schema::{FEATURE_COUNT, Feature, LABEL_COLUMN, SCHEMA_VERSION, feature_names};
pub use types::{Dataset, FeatureVector, Outcome, Sample};
