//! Spearman rank correlation via `statrs`.
//!
//! Ranks use the average of tied positions, so the coefficient matches the
//! usual textbook (and scipy) definition. The p-value is two-sided from a
//! Student's t distribution with n - 2 degrees of freedom.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::fmt;

/// Significance level used when classifying a correlation.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Result of a Spearman rank correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpearmanResult {
    /// Correlation coefficient in [-1, 1], NaN if undefined
    pub coefficient: f64,
    /// Two-sided p-value, NaN if undefined
    pub p_value: f64,
    /// Number of paired observations
    pub n: usize,
}

impl SpearmanResult {
    /// Strength bucket of |coefficient|.
    pub fn strength(&self) -> CorrelationStrength {
        CorrelationStrength::from_coefficient(self.coefficient)
    }

    pub fn is_significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_LEVEL
    }

    /// "Positive", "Negative", or "None" for a zero/undefined coefficient.
    pub fn direction(&self) -> &'static str {
        if self.coefficient > 0.0 {
            "Positive"
        } else if self.coefficient < 0.0 {
            "Negative"
        } else {
            "None"
        }
    }
}

/// Conventional strength buckets for |rho|.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
    Undefined,
}

impl CorrelationStrength {
    pub fn from_coefficient(rho: f64) -> Self {
        if rho.is_nan() {
            return CorrelationStrength::Undefined;
        }
        let abs = rho.abs();
        if abs < 0.2 {
            CorrelationStrength::VeryWeak
        } else if abs < 0.4 {
            CorrelationStrength::Weak
        } else if abs < 0.6 {
            CorrelationStrength::Moderate
        } else if abs < 0.8 {
            CorrelationStrength::Strong
        } else {
            CorrelationStrength::VeryStrong
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CorrelationStrength::VeryWeak => "Very Weak",
            CorrelationStrength::Weak => "Weak",
            CorrelationStrength::Moderate => "Moderate",
            CorrelationStrength::Strong => "Strong",
            CorrelationStrength::VeryStrong => "Very Strong",
            CorrelationStrength::Undefined => "Undefined",
        };
        f.write_str(label)
    }
}

/// 1-based ranks, ties share the average of their positions.
///
/// # Examples
///
/// ```
/// use ontouml_stats::stats::correlation::average_ranks;
///
/// assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
/// ```
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end (0-based) share rank mean(start+1 ..= end)
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Pearson correlation, NaN when either side has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        cov += (a - mean_x) * (b - mean_y);
        var_x += (a - mean_x).powi(2);
        var_y += (b - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Spearman rank correlation between two paired samples.
///
/// Mismatched lengths are truncated to the shorter side. Fewer than two
/// pairs, or a constant side, yields NaN.
pub fn spearman(x: &[f64], y: &[f64]) -> SpearmanResult {
    let n = x.len().min(y.len());
    if n < 2 {
        return SpearmanResult {
            coefficient: f64::NAN,
            p_value: f64::NAN,
            n,
        };
    }

    let rx = average_ranks(&x[..n]);
    let ry = average_ranks(&y[..n]);
    let coefficient = pearson(&rx, &ry);

    SpearmanResult {
        coefficient,
        p_value: p_value(coefficient, n),
        n,
    }
}

fn p_value(rho: f64, n: usize) -> f64 {
    if rho.is_nan() || n < 3 {
        return f64::NAN;
    }
    if rho.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = rho * (df / (1.0 - rho * rho)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ranks_without_ties() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_average_ranks_all_tied() {
        assert_eq!(average_ranks(&[7.0, 7.0, 7.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_spearman_perfect_monotonic() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![10.0, 20.0, 25.0, 100.0, 1000.0];
        let result = spearman(&x, &y);

        assert!((result.coefficient - 1.0).abs() < 1e-12);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.strength(), CorrelationStrength::VeryStrong);
        assert!(result.is_significant());
    }

    #[test]
    fn test_spearman_perfect_inverse() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![4.0, 3.0, 2.0, 1.0];
        let result = spearman(&x, &y);

        assert!((result.coefficient + 1.0).abs() < 1e-12);
        assert_eq!(result.direction(), "Negative");
    }

    #[test]
    fn test_spearman_with_ties() {
        // scipy.stats.spearmanr([1, 2, 2, 3], [1, 3, 2, 4]) == 0.9486832980505138
        let result = spearman(&[1.0, 2.0, 2.0, 3.0], &[1.0, 3.0, 2.0, 4.0]);
        assert!((result.coefficient - 0.948_683_298_050_513_8).abs() < 1e-9);
        assert!(result.p_value > 0.0 && result.p_value < 0.1);
    }

    #[test]
    fn test_spearman_constant_side_is_nan() {
        let result = spearman(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]);
        assert!(result.coefficient.is_nan());
        assert!(result.p_value.is_nan());
        assert_eq!(result.strength(), CorrelationStrength::Undefined);
        assert!(!result.is_significant());
    }

    #[test]
    fn test_spearman_too_few_pairs() {
        let result = spearman(&[1.0], &[2.0]);
        assert!(result.coefficient.is_nan());
        assert_eq!(result.n, 1);
    }

    #[test]
    fn test_strength_buckets() {
        assert_eq!(CorrelationStrength::from_coefficient(0.1), CorrelationStrength::VeryWeak);
        assert_eq!(CorrelationStrength::from_coefficient(-0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.7), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(-0.95), CorrelationStrength::VeryStrong);
        assert_eq!(CorrelationStrength::VeryStrong.to_string(), "Very Strong");
    }
}
