//! Cross-cutting class/relation ratios.

use serde::{Deserialize, Serialize};

use super::class_relation::EntityTotals;

/// `numerator / denominator`, NaN when the denominator is zero.
///
/// # Examples
///
/// ```
/// use ontouml_stats::metrics::ratios::ratio;
///
/// assert_eq!(ratio(6, 3), 2.0);
/// assert!(ratio(6, 0).is_nan());
/// ```
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Named ratios derived from class and relation totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub class_to_relation: f64,
    pub stereotyped_class_to_relation: f64,
    pub non_stereotyped_class_to_relation: f64,
    pub ontouml_class_to_relation: f64,
    pub non_ontouml_class_to_relation: f64,
    pub stereotyped_class: f64,
    pub non_stereotyped_class: f64,
    pub ontouml_class: f64,
    pub non_ontouml_class: f64,
    pub stereotyped_relation: f64,
    pub non_stereotyped_relation: f64,
    pub ontouml_relation: f64,
    pub non_ontouml_relation: f64,
}

impl Ratios {
    pub fn calculate(classes: &EntityTotals, relations: &EntityTotals) -> Self {
        Ratios {
            class_to_relation: ratio(classes.total, relations.total),
            stereotyped_class_to_relation: ratio(classes.stereotyped, relations.stereotyped),
            non_stereotyped_class_to_relation: ratio(
                classes.non_stereotyped,
                relations.non_stereotyped,
            ),
            ontouml_class_to_relation: ratio(classes.ontouml, relations.ontouml),
            non_ontouml_class_to_relation: ratio(classes.non_ontouml, relations.non_ontouml),
            stereotyped_class: ratio(classes.stereotyped, classes.total),
            non_stereotyped_class: ratio(classes.non_stereotyped, classes.total),
            ontouml_class: ratio(classes.ontouml, classes.total),
            non_ontouml_class: ratio(classes.non_ontouml, classes.total),
            stereotyped_relation: ratio(relations.stereotyped, relations.total),
            non_stereotyped_relation: ratio(relations.non_stereotyped, relations.total),
            ontouml_relation: ratio(relations.ontouml, relations.total),
            non_ontouml_relation: ratio(relations.non_ontouml, relations.total),
        }
    }

    /// Output names and values, in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 13] {
        [
            ("class_to_relation_ratio", self.class_to_relation),
            (
                "stereotyped_class_to_relation_ratio",
                self.stereotyped_class_to_relation,
            ),
            (
                "non_stereotyped_class_to_relation_ratio",
                self.non_stereotyped_class_to_relation,
            ),
            (
                "ontouml_class_to_relation_ratio",
                self.ontouml_class_to_relation,
            ),
            (
                "non_ontouml_class_to_relation_ratio",
                self.non_ontouml_class_to_relation,
            ),
            ("stereotyped_class_ratio", self.stereotyped_class),
            ("non_stereotyped_class_ratio", self.non_stereotyped_class),
            ("ontouml_class_ratio", self.ontouml_class),
            ("non_ontouml_class_ratio", self.non_ontouml_class),
            ("stereotyped_relation_ratio", self.stereotyped_relation),
            ("non_stereotyped_relation_ratio", self.non_stereotyped_relation),
            ("ontouml_relation_ratio", self.ontouml_relation),
            ("non_ontouml_relation_ratio", self.non_ontouml_relation),
        ]
    }
}
