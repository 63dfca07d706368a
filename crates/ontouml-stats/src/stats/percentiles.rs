//! Percentile calculations and descriptive statistics.
//!
//! This module provides the quartile primitive used by the outlier fences
//! and the [`StatSummary`] table computed for every count distribution of a
//! dataset.

use serde::{Deserialize, Serialize};

/// Calculate percentile value from a slice of f64 samples.
///
/// Uses linear interpolation between nearest ranks, the same estimator
/// spreadsheet tools and pandas use by default.
///
/// # Arguments
///
/// * `samples` - Slice of samples (will be sorted internally)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is invalid
///
/// # Examples
///
/// ```
/// use ontouml_stats::stats::percentiles::percentile;
///
/// let data = vec![10.0, 12.0, 11.0, 13.0, 100.0];
/// assert_eq!(percentile(&data, 25.0), Some(11.0));
/// assert_eq!(percentile(&data, 75.0), Some(13.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(percentile_of_sorted(&sorted, p))
}

/// Percentile of an already sorted, non-empty slice.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        sorted[lower_index]
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        lower_value + fraction * (upper_value - lower_value)
    }
}

/// Descriptive statistics over one count distribution.
///
/// An empty distribution yields `count == 0` and NaN everywhere else, so
/// downstream CSV rows keep their columns. A single sample has `std == 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (divisor n - 1)
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// q3 - q1
    pub iqr: f64,
}

impl StatSummary {
    /// Statistic names in output order.
    pub const FIELDS: [&'static str; 9] = [
        "count", "mean", "std", "min", "q1", "median", "q3", "max", "iqr",
    ];

    /// Compute summary statistics from samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontouml_stats::stats::StatSummary;
    ///
    /// let summary = StatSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    /// assert_eq!(summary.count, 10);
    /// assert_eq!(summary.mean, 5.5);
    /// assert_eq!(summary.median, 5.5);
    /// assert!((summary.iqr - 4.5).abs() < 1e-10);
    /// ```
    pub fn compute(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::empty();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();
        let min = sorted[0];
        let max = sorted[count - 1];

        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;

        let variance = if count > 1 {
            let squared_diffs: f64 = sorted.iter().map(|&x| (x - mean).powi(2)).sum();
            squared_diffs / (count - 1) as f64
        } else {
            0.0
        };

        let q1 = percentile_of_sorted(&sorted, 25.0);
        let median = percentile_of_sorted(&sorted, 50.0);
        let q3 = percentile_of_sorted(&sorted, 75.0);

        StatSummary {
            count,
            mean,
            std: variance.sqrt(),
            min,
            q1,
            median,
            q3,
            max,
            iqr: q3 - q1,
        }
    }

    /// Convenience wrapper over integer counts.
    pub fn from_counts(counts: &[u64]) -> Self {
        let samples: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::compute(&samples)
    }

    /// The "not available" summary of an empty distribution.
    pub fn empty() -> Self {
        StatSummary {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
            iqr: f64::NAN,
        }
    }

    /// Look up a statistic by its output name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "count" => Some(self.count as f64),
            "mean" => Some(self.mean),
            "std" => Some(self.std),
            "min" => Some(self.min),
            "q1" => Some(self.q1),
            "median" => Some(self.median),
            "q3" => Some(self.q3),
            "max" => Some(self.max),
            "iqr" => Some(self.iqr),
            _ => None,
        }
    }

    /// `(name, value)` pairs in [`StatSummary::FIELDS`] order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        Self::FIELDS
            .iter()
            .map(|&name| (name, self.get(name).unwrap_or(f64::NAN)))
            .collect()
    }

    /// Coefficient of variation (std / mean), NaN when the mean is zero.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            f64::NAN
        } else {
            self.std / self.mean
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty_samples() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_sample() {
        let samples = vec![42.0];
        assert_eq!(percentile(&samples, 50.0), Some(42.0));
        assert_eq!(percentile(&samples, 0.0), Some(42.0));
        assert_eq!(percentile(&samples, 100.0), Some(42.0));
    }

    #[test]
    fn test_percentile_invalid_p() {
        let samples = vec![1.0, 2.0, 3.0];
        assert_eq!(percentile(&samples, -1.0), None);
        assert_eq!(percentile(&samples, 101.0), None);
    }

    #[test]
    fn test_percentile_with_interpolation() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        let p25 = percentile(&samples, 25.0).unwrap();
        assert!((p25 - 3.25).abs() < 1e-10);

        let p75 = percentile(&samples, 75.0).unwrap();
        assert!((p75 - 7.75).abs() < 1e-10);
    }

    #[test]
    fn test_percentile_unsorted_samples() {
        let samples = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile(&samples, 50.0), Some(3.0));
    }

    #[test]
    fn test_summary_empty_is_not_available() {
        let summary = StatSummary::compute(&[]);

        assert_eq!(summary.count, 0);
        for (name, value) in summary.entries() {
            if name != "count" {
                assert!(value.is_nan(), "{} should be NaN", name);
            }
        }
    }

    #[test]
    fn test_summary_single_sample_std_is_zero() {
        let summary = StatSummary::compute(&[42.0]);

        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 42.0);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.min, 42.0);
        assert_eq!(summary.q1, 42.0);
        assert_eq!(summary.median, 42.0);
        assert_eq!(summary.q3, 42.0);
        assert_eq!(summary.max, 42.0);
        assert_eq!(summary.iqr, 0.0);
    }

    #[test]
    fn test_summary_quartiles_of_class_counts() {
        let summary = StatSummary::from_counts(&[10, 12, 11, 13, 100]);

        assert_eq!(summary.q1, 11.0);
        assert_eq!(summary.median, 12.0);
        assert_eq!(summary.q3, 13.0);
        assert_eq!(summary.iqr, 2.0);
        assert_eq!(summary.max, 100.0);
        assert_eq!(summary.mean, 29.2);
    }

    #[test]
    fn test_summary_sample_std_dev() {
        let samples = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = StatSummary::compute(&samples);

        assert_eq!(summary.mean, 5.0);
        let expected_std = (32.0_f64 / 7.0).sqrt();
        assert!((summary.std - expected_std).abs() < 1e-10);
    }

    #[test]
    fn test_summary_get_unknown_name() {
        let summary = StatSummary::compute(&[1.0, 2.0]);
        assert_eq!(summary.get("p95"), None);
        assert_eq!(summary.get("max"), Some(2.0));
    }

    #[test]
    fn test_coefficient_of_variation_zero_mean() {
        let summary = StatSummary::compute(&[0.0, 0.0, 0.0]);
        assert!(summary.coefficient_of_variation().is_nan());
    }
}
