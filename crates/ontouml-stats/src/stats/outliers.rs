//! Outlier detection with Tukey fences.
//!
//! Points outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` are outliers. The fences can
//! be built from raw samples or from quartiles that were already computed,
//! which is how datasets use them.

use serde::{Deserialize, Serialize};

use super::percentiles::percentile;

/// Standard Tukey multiplier.
pub const TUKEY_K: f64 = 1.5;

/// Lower and upper Tukey fences for one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TukeyFences {
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f64,
    /// Q1 - 1.5*IQR
    pub lower: f64,
    /// Q3 + 1.5*IQR
    pub upper: f64,
}

impl TukeyFences {
    /// Build fences from known quartiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontouml_stats::stats::outliers::TukeyFences;
    ///
    /// let fences = TukeyFences::from_quartiles(11.0, 13.0, 2.0);
    /// assert_eq!(fences.lower, 8.0);
    /// assert_eq!(fences.upper, 16.0);
    /// assert!(fences.is_outlier(100.0));
    /// ```
    pub fn from_quartiles(q1: f64, q3: f64, iqr: f64) -> Self {
        TukeyFences {
            q1,
            q3,
            iqr,
            lower: q1 - TUKEY_K * iqr,
            upper: q3 + TUKEY_K * iqr,
        }
    }

    /// Build fences from samples.
    ///
    /// Returns `None` if samples is empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let q1 = percentile(samples, 25.0)?;
        let q3 = percentile(samples, 75.0)?;
        Some(Self::from_quartiles(q1, q3, q3 - q1))
    }

    /// Strictly outside the fences. NaN values and NaN fences never match.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Indices of samples outside the fences, in input order.
    pub fn outlier_indices(&self, samples: &[f64]) -> Vec<usize> {
        samples
            .iter()
            .enumerate()
            .filter_map(|(i, &value)| if self.is_outlier(value) { Some(i) } else { None })
            .collect()
    }

    /// Samples inside the fences, in input order.
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .copied()
            .filter(|&value| !self.is_outlier(value))
            .collect()
    }
}
