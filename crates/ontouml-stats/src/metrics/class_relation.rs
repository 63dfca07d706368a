//! Per-model stereotype tables and the class/relation partition metrics.
//!
//! A [`StereotypeTable`] has one row per model and one column per stereotype
//! (reserved `none`/`other` included). [`ClassRelationMetrics`] splits every
//! row into stereotyped / non-stereotyped and OntoUML-valid / non-valid
//! counts, keeping both the scalar totals and the per-model vectors that
//! later feed [`StatSummary`](crate::stats::StatSummary).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Result, StatsError};
use crate::model::{EntityKind, Model, StereotypeCounts, NONE_KEY, OTHER_KEY};
use crate::table::{Cell, Table};

/// Construct totals of one entity kind.
///
/// `stereotyped + non_stereotyped == total` and
/// `ontouml + non_ontouml == stereotyped`; `none` is neither valid nor
/// non-valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTotals {
    pub total: u64,
    pub stereotyped: u64,
    pub non_stereotyped: u64,
    pub ontouml: u64,
    pub non_ontouml: u64,
}

impl EntityTotals {
    /// Partition one model's stereotype counts.
    pub fn from_counts(counts: &StereotypeCounts, allowlist: &BTreeSet<String>) -> Self {
        let mut totals = EntityTotals::default();
        for (name, &count) in counts {
            totals.add(name, count, allowlist);
        }
        totals.finish()
    }

    fn add(&mut self, stereotype: &str, count: u64, allowlist: &BTreeSet<String>) {
        self.total += count;
        if stereotype == NONE_KEY {
            self.non_stereotyped += count;
        } else if allowlist.contains(stereotype) {
            self.ontouml += count;
        }
    }

    fn finish(mut self) -> Self {
        self.stereotyped = self.total - self.non_stereotyped;
        self.non_ontouml = self.stereotyped.saturating_sub(self.ontouml);
        self
    }

    fn accumulate(&mut self, other: &EntityTotals) {
        self.total += other.total;
        self.stereotyped += other.stereotyped;
        self.non_stereotyped += other.non_stereotyped;
        self.ontouml += other.ontouml;
        self.non_ontouml += other.non_ontouml;
    }

    /// `(total_classes, ...)`-style named entries.
    pub fn entries(&self, kind: EntityKind) -> Vec<(String, f64)> {
        let plural = kind.plural();
        vec![
            (format!("total_{}", plural), self.total as f64),
            (format!("stereotyped_{}", plural), self.stereotyped as f64),
            (format!("non_stereotyped_{}", plural), self.non_stereotyped as f64),
            (format!("ontouml_{}", plural), self.ontouml as f64),
            (format!("non_ontouml_{}", plural), self.non_ontouml as f64),
        ]
    }
}

/// One model's row in a [`StereotypeTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct StereotypeRow {
    pub model: String,
    pub counts: Vec<u64>,
}

/// Models × stereotypes count matrix for one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct StereotypeTable {
    kind: EntityKind,
    columns: Vec<String>,
    rows: Vec<StereotypeRow>,
}

impl StereotypeTable {
    /// Build the table from models that share a stereotype key set.
    ///
    /// Columns follow the first model's key order. An empty model list gives
    /// a table with only the reserved columns and no rows.
    pub fn from_models(dataset: &str, kind: EntityKind, models: &[Model]) -> Result<Self> {
        let columns: Vec<String> = match models.first() {
            Some(first) => first.stereotypes(kind).keys().cloned().collect(),
            None => vec![NONE_KEY.to_string(), OTHER_KEY.to_string()],
        };

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let counts = model.stereotypes(kind);
            if counts.len() != columns.len() || !columns.iter().all(|c| counts.contains_key(c)) {
                return Err(StatsError::InconsistentStereotypeKeys {
                    dataset: dataset.to_string(),
                    model: model.name.clone(),
                    kind,
                });
            }
            rows.push(StereotypeRow {
                model: model.name.clone(),
                counts: columns.iter().map(|c| counts[c]).collect(),
            });
        }

        Ok(Self {
            kind,
            columns,
            rows,
        })
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StereotypeRow] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of the table without the reserved `none`/`other` columns.
    pub fn without_reserved(&self) -> Self {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() != NONE_KEY && c.as_str() != OTHER_KEY)
            .map(|(i, _)| i)
            .collect();

        Self {
            kind: self.kind,
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| StereotypeRow {
                    model: row.model.clone(),
                    counts: keep.iter().map(|&i| row.counts[i]).collect(),
                })
                .collect(),
        }
    }

    /// Per-stereotype sums across all models.
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.columns.len()];
        for row in &self.rows {
            for (sum, &count) in sums.iter_mut().zip(&row.counts) {
                *sum += count;
            }
        }
        sums
    }

    /// `model` + one column per stereotype.
    pub fn to_table(&self) -> Table {
        let mut headers = vec!["model".to_string()];
        headers.extend(self.columns.iter().cloned());

        let mut table = Table::new(headers);
        for row in &self.rows {
            let mut cells = vec![Cell::from(row.model.as_str())];
            cells.extend(row.counts.iter().map(|&c| Cell::Int(c as i64)));
            table.push_row(cells);
        }
        table
    }
}

/// Scalar totals plus the per-model distributions behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRelationMetrics {
    pub kind: EntityKind,
    pub totals: EntityTotals,
    pub total_counts: Vec<u64>,
    pub stereotyped_counts: Vec<u64>,
    pub non_stereotyped_counts: Vec<u64>,
    pub ontouml_counts: Vec<u64>,
    pub non_ontouml_counts: Vec<u64>,
}

impl ClassRelationMetrics {
    /// Partition every row of `table` against `allowlist`.
    ///
    /// # Errors
    ///
    /// [`StatsError::MissingColumn`] if the table has no `none` column.
    pub fn compute(table: &StereotypeTable, allowlist: &BTreeSet<String>) -> Result<Self> {
        if table.column_index(NONE_KEY).is_none() {
            return Err(StatsError::MissingColumn {
                kind: table.kind(),
                column: NONE_KEY.to_string(),
            });
        }

        let n = table.rows().len();
        let mut metrics = ClassRelationMetrics {
            kind: table.kind(),
            totals: EntityTotals::default(),
            total_counts: Vec::with_capacity(n),
            stereotyped_counts: Vec::with_capacity(n),
            non_stereotyped_counts: Vec::with_capacity(n),
            ontouml_counts: Vec::with_capacity(n),
            non_ontouml_counts: Vec::with_capacity(n),
        };

        for row in table.rows() {
            let mut row_totals = EntityTotals::default();
            for (name, &count) in table.columns().iter().zip(&row.counts) {
                row_totals.add(name, count, allowlist);
            }
            let row_totals = row_totals.finish();

            metrics.totals.accumulate(&row_totals);
            metrics.total_counts.push(row_totals.total);
            metrics.stereotyped_counts.push(row_totals.stereotyped);
            metrics.non_stereotyped_counts.push(row_totals.non_stereotyped);
            metrics.ontouml_counts.push(row_totals.ontouml);
            metrics.non_ontouml_counts.push(row_totals.non_ontouml);
        }

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::model;

    fn allowlist(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entity_totals_partition() {
        let m = model("m1", &[("kind", 4), ("role", 2), ("other", 1), ("none", 3)], &[]);
        let totals = EntityTotals::from_counts(m.stereotypes(EntityKind::Class), &allowlist(&["kind"]));

        assert_eq!(totals.total, 10);
        assert_eq!(totals.non_stereotyped, 3);
        assert_eq!(totals.stereotyped, 7);
        assert_eq!(totals.ontouml, 4);
        assert_eq!(totals.non_ontouml, 3);
    }

    #[test]
    fn test_table_columns_follow_key_order() {
        let models = vec![
            model("a", &[("kind", 1), ("none", 2), ("other", 0)], &[]),
            model("b", &[("kind", 3), ("none", 0), ("other", 1)], &[]),
        ];
        let table = StereotypeTable::from_models("d", EntityKind::Class, &models).unwrap();

        assert_eq!(table.columns(), &["kind", "none", "other"]);
        assert_eq!(table.rows()[1].counts, vec![3, 0, 1]);
        assert_eq!(table.column_sums(), vec![4, 2, 1]);
    }

    #[test]
    fn test_table_rejects_mismatched_keys() {
        let models = vec![
            model("a", &[("kind", 1), ("none", 0), ("other", 0)], &[]),
            model("b", &[("role", 1), ("none", 0), ("other", 0)], &[]),
        ];
        let err = StereotypeTable::from_models("d", EntityKind::Class, &models).unwrap_err();

        assert!(matches!(err, StatsError::InconsistentStereotypeKeys { ref model, .. } if model == "b"));
    }

    #[test]
    fn test_empty_table_has_reserved_columns() {
        let table = StereotypeTable::from_models("d", EntityKind::Relation, &[]).unwrap();
        let metrics = ClassRelationMetrics::compute(&table, &allowlist(&[])).unwrap();

        assert!(table.rows().is_empty());
        assert_eq!(metrics.totals, EntityTotals::default());
        assert!(metrics.total_counts.is_empty());
    }

    #[test]
    fn test_without_reserved_drops_none_and_other() {
        let models = vec![model("a", &[("kind", 1), ("none", 5), ("other", 2)], &[])];
        let table = StereotypeTable::from_models("d", EntityKind::Class, &models).unwrap();
        let clean = table.without_reserved();

        assert_eq!(clean.columns(), &["kind"]);
        assert_eq!(clean.rows()[0].counts, vec![1]);
        assert!(ClassRelationMetrics::compute(&clean, &allowlist(&["kind"])).is_err());
    }

    #[test]
    fn test_metrics_vectors_and_totals() {
        let models = vec![
            model("a", &[("kind", 4), ("none", 1), ("other", 1)], &[]),
            model("b", &[("kind", 2), ("none", 3), ("other", 0)], &[]),
        ];
        let table = StereotypeTable::from_models("d", EntityKind::Class, &models).unwrap();
        let metrics = ClassRelationMetrics::compute(&table, &allowlist(&["kind"])).unwrap();

        assert_eq!(metrics.total_counts, vec![6, 5]);
        assert_eq!(metrics.stereotyped_counts, vec![5, 2]);
        assert_eq!(metrics.non_stereotyped_counts, vec![1, 3]);
        assert_eq!(metrics.ontouml_counts, vec![4, 2]);
        assert_eq!(metrics.non_ontouml_counts, vec![1, 0]);
        assert_eq!(metrics.totals.total, 11);
        assert_eq!(metrics.totals.ontouml, 6);

        for i in 0..2 {
            assert_eq!(
                metrics.stereotyped_counts[i] + metrics.non_stereotyped_counts[i],
                metrics.total_counts[i]
            );
        }
    }

    #[test]
    fn test_unrecognized_stereotype_is_non_valid() {
        let models = vec![model("a", &[("gizmo", 2), ("none", 0), ("other", 1)], &[])];
        let table = StereotypeTable::from_models("d", EntityKind::Class, &models).unwrap();
        let metrics = ClassRelationMetrics::compute(&table, &allowlist(&["kind"])).unwrap();

        assert_eq!(metrics.totals.ontouml, 0);
        assert_eq!(metrics.totals.non_ontouml, 3);
    }

    #[test]
    fn test_entries_names() {
        let totals = EntityTotals {
            total: 3,
            stereotyped: 2,
            non_stereotyped: 1,
            ontouml: 2,
            non_ontouml: 0,
        };
        let names: Vec<String> = totals
            .entries(EntityKind::Relation)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(
            names,
            vec![
                "total_relations",
                "stereotyped_relations",
                "non_stereotyped_relations",
                "ontouml_relations",
                "non_ontouml_relations"
            ]
        );
    }
}
