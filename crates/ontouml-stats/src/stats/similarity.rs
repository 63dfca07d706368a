//! Set similarity coefficients.
//!
//! Stereotypes are compared through the sets of models they occur in.

use std::collections::BTreeSet;

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`.
///
/// Returns 0.0 if both sets are empty.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use ontouml_stats::stats::similarity::jaccard;
///
/// let a: BTreeSet<&str> = ["m1", "m2", "m3"].into_iter().collect();
/// let b: BTreeSet<&str> = ["m2", "m3", "m4"].into_iter().collect();
/// assert_eq!(jaccard(&a, &b), 0.5);
/// ```
pub fn jaccard<T: Ord>(set_a: &BTreeSet<T>, set_b: &BTreeSet<T>) -> f64 {
    let intersection = set_a.intersection(set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Sørensen-Dice coefficient `2|A ∩ B| / (|A| + |B|)`.
///
/// Returns 0.0 if both sets are empty.
pub fn dice<T: Ord>(set_a: &BTreeSet<T>, set_b: &BTreeSet<T>) -> f64 {
    let total = set_a.len() + set_b.len();
    if total == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(set_b).count();
    2.0 * intersection as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&'static str]) -> BTreeSet<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_identical_sets() {
        let a = set(&["m1", "m2"]);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(dice(&a, &a), 1.0);
    }

    #[test]
    fn test_disjoint_sets() {
        let a = set(&["m1"]);
        let b = set(&["m2"]);
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(dice(&a, &b), 0.0);
    }

    #[test]
    fn test_both_empty() {
        let a = set(&[]);
        assert_eq!(jaccard(&a, &a), 0.0);
        assert_eq!(dice(&a, &a), 0.0);
    }

    #[test]
    fn test_dice_is_at_least_jaccard() {
        let a = set(&["m1", "m2", "m3"]);
        let b = set(&["m2", "m3", "m4"]);
        assert_eq!(jaccard(&a, &b), 0.5);
        assert!((dice(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
    }
}
