//! Per-feature standardization fitted on the training partition.

use diabetes_data::{FEATURE_COUNT, FeatureVector};
use serde::{Deserialize, Serialize};

/// Centers each feature on its training mean and divides by its training
/// standard deviation. Constant features keep a scale of 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fit on a set of rows using the population standard deviation.
    pub fn fit<'a>(rows: impl IntoIterator<Item = &'a FeatureVector>) -> Self {
        let rows: Vec<&FeatureVector> = rows.into_iter().collect();
        if rows.is_empty() {
            return Self::identity();
        }

        let mut sum = [0.0; FEATURE_COUNT];
        let mut sum_sq = [0.0; FEATURE_COUNT];
        for row in &rows {
            for (j, value) in row.as_array().iter().enumerate() {
                sum[j] += value;
            }
        }

        let n = rows.len() as f64;
        let mean = sum.map(|total| total / n);
        for row in &rows {
            for (j, value) in row.as_array().iter().enumerate() {
                let centered = value - mean[j];
                sum_sq[j] += centered * centered;
            }
        }

        let scale = sum_sq.map(|total| {
            let std = (total / n).sqrt();
            if std > 0.0 && std.is_finite() { std } else { 1.0 }
        });

        Self { mean, scale }
    }

    /// A scaler that leaves values unchanged.
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    /// Build from stored parameters. Returns `None` if any scale is not a
    /// positive finite number or any mean is not finite.
    pub fn from_parts(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Option<Self> {
        let valid = mean.iter().all(|m| m.is_finite())
            && scale.iter().all(|s| s.is_finite() && *s > 0.0);
        valid.then_some(Self { mean, scale })
    }

    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }

    /// Standardize one row.
    #[inline]
    pub fn transform(&self, row: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let values = row.as_array();
        std::array::from_fn(|j| (values[j] - self.mean[j]) / self.scale[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(first: f64, second: f64) -> FeatureVector {
        let mut values = [5.0; FEATURE_COUNT];
        values[0] = first;
        values[1] = second;
        FeatureVector::new(values)
    }

    #[test]
    fn test_fit_mean_and_scale() {
        let rows = [row(1.0, 10.0), row(3.0, 30.0)];
        let scaler = StandardScaler::fit(rows.iter());

        assert_eq!(scaler.mean()[0], 2.0);
        assert_eq!(scaler.mean()[1], 20.0);
        assert_eq!(scaler.scale()[0], 1.0);
        assert_eq!(scaler.scale()[1], 10.0);
    }

    #[test]
    fn test_constant_feature_keeps_unit_scale() {
        let rows = [row(1.0, 10.0), row(3.0, 30.0)];
        let scaler = StandardScaler::fit(rows.iter());
        // columns 2.. are constant 5.0
        assert_eq!(scaler.scale()[2], 1.0);
        assert_eq!(scaler.transform(&rows[0])[2], 0.0);
    }

    #[test]
    fn test_transform_standardizes() {
        let rows = [row(1.0, 10.0), row(3.0, 30.0)];
        let scaler = StandardScaler::fit(rows.iter());
        let scaled = scaler.transform(&rows[1]);
        assert_eq!(scaled[0], 1.0);
        assert_eq!(scaled[1], 1.0);
    }

    #[test]
    fn test_from_parts_rejects_bad_scale() {
        assert!(StandardScaler::from_parts([0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]).is_some());
        assert!(StandardScaler::from_parts([0.0; FEATURE_COUNT], [0.0; FEATURE_COUNT]).is_none());
        assert!(
            StandardScaler::from_parts([f64::NAN; FEATURE_COUNT], [1.0; FEATURE_COUNT]).is_none()
        );
    }

    #[test]
    fn test_empty_fit_is_identity() {
        let scaler = StandardScaler::fit(std::iter::empty());
        assert_eq!(scaler, StandardScaler::identity());
    }
}
