//! CSV dataset loading.
//!
//! Columns are selected by name, so extra columns and any column order in the
//! file are fine. Values are taken as-is: no range checks, no imputation.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{DataError, Result};
use crate::schema::{FEATURE_COUNT, Feature, LABEL_COLUMN};
use crate::types::{Dataset, FeatureVector, Outcome, Sample};

/// Reads the diabetes dataset from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load and type the dataset at `path`.
    ///
    /// # Errors
    ///
    /// - [`DataError::NotFound`] if the file does not exist
    /// - [`DataError::Parse`] if the file is not readable as CSV
    /// - [`DataError::MissingColumn`] if a feature or the label column is absent
    /// - [`DataError::InvalidValue`] if a cell is empty or non-numeric, or a
    ///   label is not 0/1
    pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound {
                path: path.display().to_string(),
            });
        }

        debug!("Reading dataset from {}", path.display());
        let df = read_csv(path)?;
        let dataset = Self::from_dataframe(&df)?;

        let (negatives, positives) = dataset.class_counts();
        info!(
            rows = dataset.len(),
            negatives, positives, "Dataset loaded from {}", path.display()
        );
        Ok(dataset)
    }

    /// Type an already-loaded frame.
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
        let present: Vec<&str> = df
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();

        let required = Feature::ALL
            .iter()
            .map(|feature| feature.column_name())
            .chain(std::iter::once(LABEL_COLUMN));
        for column in required {
            if !present.contains(&column) {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }

        let height = df.height();
        let mut rows = vec![[0.0_f64; FEATURE_COUNT]; height];
        for feature in Feature::ALL {
            let values = numeric_column(df, feature.column_name())?;
            for (row, value) in values.into_iter().enumerate() {
                rows[row][feature.index()] = value;
            }
        }

        let labels = numeric_column(df, LABEL_COLUMN)?;
        let samples = rows
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(row, (values, label))| {
                let outcome = Outcome::from_value(label).ok_or_else(|| DataError::InvalidValue {
                    column: LABEL_COLUMN.to_string(),
                    row,
                    reason: format!("expected 0 or 1, found {label}"),
                })?;
                Ok(Sample {
                    features: FeatureVector::new(values),
                    outcome,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::new(samples))
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::Parse(e.to_string()))
}

/// Read a column as `f64`, failing on the first cell that is empty or not numeric.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?;
    let cast = column.cast(&DataType::Float64)?;
    let values = cast.f64()?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                let reason = match column.get(row) {
                    Ok(AnyValue::Null) | Err(_) => "missing value".to_string(),
                    Ok(cell) => format!("not a number: {cell}"),
                };
                DataError::InvalidValue {
                    column: name.to_string(),
                    row,
                    reason,
                }
            })
        })
        .collect()
}
