//! Statistical primitives
//!
//! This module provides the numeric building blocks of the engine:
//! linear-interpolation percentiles and descriptive summaries, Tukey fences,
//! Spearman rank correlation, and set similarity coefficients.
//!
//! # Examples
//!
//! ```
//! use ontouml_stats::stats::{StatSummary, TukeyFences};
//!
//! let class_counts = vec![10.0, 12.0, 11.0, 13.0, 100.0];
//!
//! let summary = StatSummary::compute(&class_counts);
//! let fences = TukeyFences::from_quartiles(summary.q1, summary.q3, summary.iqr);
//!
//! assert_eq!(fences.upper, 16.0);
//! assert_eq!(fences.outlier_indices(&class_counts), vec![4]);
//! ```

pub mod correlation;
pub mod outliers;
pub mod percentiles;
pub mod similarity;

// Re-export main types and functions
pub use correlation::{spearman, CorrelationStrength, SpearmanResult};
pub use outliers::TukeyFences;
pub use percentiles::{percentile, StatSummary};

/// Value equality for reproducibility checks: NaN equals NaN.
pub fn same_value(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

/// Two flat `(name, value)` rows hold the same names, in order, with
/// [`same_value`] values.
pub fn same_entries(a: &[(String, f64)], b: &[(String, f64)]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|((name_a, va), (name_b, vb))| name_a == name_b && same_value(*va, *vb))
}
