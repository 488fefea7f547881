//! Error types for dataset loading.
//!
//! Every fallible function in this crate returns [`Result<T>`], whose error
//! side is [`DataError`]. Errors serialize to a `{code, message}` pair so the
//! server can surface them without knowing every variant.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for dataset loading.
#[derive(Error, Debug)]
pub enum DataError {
    /// The dataset file does not exist.
    #[error("Dataset not found: {path}")]
    NotFound { path: String },

    /// The file exists but is not readable as CSV.
    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    /// A required column is absent from the header.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A cell could not be read as the value its column requires.
    #[error("Invalid value in column '{column}' at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl DataError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "DATASET_NOT_FOUND",
            Self::Parse(_) => "DATASET_PARSE_ERROR",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }

    /// Whether the file simply was not there, as opposed to being malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Serialize for DataError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DataError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DataError>;
