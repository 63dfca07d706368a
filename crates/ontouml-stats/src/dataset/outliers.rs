//! Outlier detection on class/relation counts and outlier-free forks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

use super::Dataset;
use crate::error::{Result, StatsError};
use crate::stats::TukeyFences;
use crate::table::{Cell, Table};

/// Which counts put a model outside the fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierKind {
    Class,
    Relation,
    ClassAndRelation,
}

impl OutlierKind {
    fn from_flags(class: bool, relation: bool) -> Option<Self> {
        match (class, relation) {
            (true, true) => Some(OutlierKind::ClassAndRelation),
            (true, false) => Some(OutlierKind::Class),
            (false, true) => Some(OutlierKind::Relation),
            (false, false) => None,
        }
    }
}

impl fmt::Display for OutlierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            OutlierKind::Class => "class",
            OutlierKind::Relation => "relation",
            OutlierKind::ClassAndRelation => "class, relation",
        };
        f.write_str(tag)
    }
}

/// One flagged model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub model: String,
    pub kind: OutlierKind,
    pub total_classes: u64,
    pub total_relations: u64,
    /// Reported only; never used to flag a model. NaN without relations.
    pub class_relation_ratio: f64,
}

/// Fences for both count dimensions, read from the dataset statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFences {
    pub classes: TukeyFences,
    pub relations: TukeyFences,
}

impl Dataset {
    /// Tukey fences from the stored `class_total` / `relation_total`
    /// quartiles.
    pub fn outlier_fences(&self) -> Result<OutlierFences> {
        let not_computed = || StatsError::StatisticsNotComputed {
            dataset: self.name.clone(),
        };
        let stats = self.statistics().ok_or_else(not_computed)?;
        let classes = stats.distribution("class_total").ok_or_else(not_computed)?;
        let relations = stats.distribution("relation_total").ok_or_else(not_computed)?;

        Ok(OutlierFences {
            classes: TukeyFences::from_quartiles(classes.q1, classes.q3, classes.iqr),
            relations: TukeyFences::from_quartiles(relations.q1, relations.q3, relations.iqr),
        })
    }

    /// Tag every model whose class or relation count lies strictly outside
    /// the fences, in model order.
    ///
    /// # Errors
    ///
    /// [`StatsError::StatisticsNotComputed`] before
    /// [`Dataset::calculate_dataset_statistics`].
    pub fn classify_outliers(&self) -> Result<Vec<OutlierRecord>> {
        let fences = self.outlier_fences()?;

        let records: Vec<OutlierRecord> = self
            .models()
            .iter()
            .filter_map(|model| {
                let kind = OutlierKind::from_flags(
                    fences.classes.is_outlier(model.total_class_number as f64),
                    fences.relations.is_outlier(model.total_relation_number as f64),
                )?;
                Some(OutlierRecord {
                    model: model.name.clone(),
                    kind,
                    total_classes: model.total_class_number,
                    total_relations: model.total_relation_number,
                    class_relation_ratio: model.class_relation_ratio(),
                })
            })
            .collect();

        if records.is_empty() {
            info!(dataset = %self.name, "No outliers found; all models are within the normal range");
        } else {
            let summary: Vec<String> = records
                .iter()
                .map(|r| format!("{} ({})", r.model, r.kind))
                .collect();
            warn!(dataset = %self.name, count = records.len(), outliers = %summary.join("; "), "Outliers found");
        }

        Ok(records)
    }

    /// Names of the outlier models, in model order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontouml_stats::config::StereotypeAllowlists;
    /// use ontouml_stats::dataset::Dataset;
    /// use ontouml_stats::model::{Model, StereotypeCounts};
    ///
    /// let models: Vec<Model> = [10, 12, 11, 13, 100]
    ///     .iter()
    ///     .enumerate()
    ///     .map(|(i, &n)| {
    ///         let classes: StereotypeCounts =
    ///             [("kind".to_string(), n), ("none".to_string(), 0), ("other".to_string(), 0)].into();
    ///         let relations: StereotypeCounts =
    ///             [("none".to_string(), 4), ("other".to_string(), 0)].into();
    ///         Model::new(format!("m{}", i), 2020, false, classes, relations).unwrap()
    ///     })
    ///     .collect();
    ///
    /// let mut dataset = Dataset::new("demo", models).unwrap();
    /// dataset.calculate_dataset_statistics(&StereotypeAllowlists::default()).unwrap();
    ///
    /// assert_eq!(dataset.identify_outliers().unwrap(), vec!["m4".to_string()]);
    /// ```
    pub fn identify_outliers(&self) -> Result<Vec<String>> {
        Ok(self
            .classify_outliers()?
            .into_iter()
            .map(|r| r.model)
            .collect())
    }

    /// New dataset named `{name}_filtered` holding clones of every model not
    /// in `excluded`, with all statistics cleared. `self` is not modified.
    pub fn fork_without_outliers<S: AsRef<str>>(&self, excluded: &[S]) -> Dataset {
        let excluded: BTreeSet<&str> = excluded.iter().map(|s| s.as_ref()).collect();

        let models = self
            .models()
            .iter()
            .filter(|m| !excluded.contains(m.name.as_str()))
            .cloned()
            .collect();

        let mut fork = Dataset::from_parts(format!("{}_filtered", self.name), models);
        fork.reset_statistics();

        info!(
            dataset = %self.name,
            fork = %fork.name,
            removed = self.num_models() - fork.num_models(),
            "Forked dataset without outliers"
        );
        fork
    }
}

/// `dataset, model, reason` rows for the given outlier records.
pub fn outliers_table<'a, I>(records: I) -> Table
where
    I: IntoIterator<Item = (&'a str, &'a OutlierRecord)>,
{
    let mut table = Table::new(["dataset", "model", "reason"]);
    for (dataset, record) in records {
        table.push_row(vec![
            Cell::from(dataset),
            Cell::from(record.model.as_str()),
            Cell::from(record.kind.to_string()),
        ]);
    }
    table
}
