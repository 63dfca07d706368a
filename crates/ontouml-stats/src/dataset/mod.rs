//! Named collections of models and their aggregate statistics.

pub mod cohorts;
pub mod outliers;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument};

use crate::config::StereotypeAllowlists;
use crate::error::{Result, StatsError};
use crate::metrics::{ClassRelationMetrics, EntityTotals, Ratios, StereotypeTable};
use crate::model::{EntityKind, Model};
use crate::stats::{same_entries, StatSummary};
use crate::stereotypes::StereotypeAnalysis;
use crate::table::{union_table, Cell, Table};

pub use outliers::{OutlierKind, OutlierRecord};

/// Summary of one per-model count distribution, e.g. `class_total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub category: String,
    pub summary: StatSummary,
}

/// Dataset-level aggregate statistics.
///
/// The derived `PartialEq` is IEEE equality: ratios and summaries are often
/// NaN, and NaN fields never compare equal. Use
/// [`DatasetStatistics::same_values`] to check that two runs agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub class_totals: EntityTotals,
    pub relation_totals: EntityTotals,
    pub ratios: Ratios,
    /// `class_*` then `relation_*`, five categories each
    pub distributions: Vec<Distribution>,
}

impl DatasetStatistics {
    fn compute(classes: &ClassRelationMetrics, relations: &ClassRelationMetrics) -> Self {
        let mut distributions = Vec::with_capacity(10);
        for (prefix, metrics) in [("class", classes), ("relation", relations)] {
            let vectors = [
                ("total", &metrics.total_counts),
                ("stereotyped", &metrics.stereotyped_counts),
                ("non_stereotyped", &metrics.non_stereotyped_counts),
                ("ontouml", &metrics.ontouml_counts),
                ("non_ontouml", &metrics.non_ontouml_counts),
            ];
            for (suffix, counts) in vectors {
                distributions.push(Distribution {
                    category: format!("{}_{}", prefix, suffix),
                    summary: StatSummary::from_counts(counts),
                });
            }
        }

        Self {
            class_totals: classes.totals,
            relation_totals: relations.totals,
            ratios: Ratios::calculate(&classes.totals, &relations.totals),
            distributions,
        }
    }

    pub fn distribution(&self, category: &str) -> Option<&StatSummary> {
        self.distributions
            .iter()
            .find(|d| d.category == category)
            .map(|d| &d.summary)
    }

    /// Flat `(metric, value)` row: totals, ratios, then `{category}_{stat}`.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut entries = self.class_totals.entries(EntityKind::Class);
        entries.extend(self.relation_totals.entries(EntityKind::Relation));
        entries.extend(
            self.ratios
                .entries()
                .iter()
                .map(|(name, value)| (name.to_string(), *value)),
        );
        for d in &self.distributions {
            entries.extend(
                d.summary
                    .entries()
                    .into_iter()
                    .map(|(stat, value)| (format!("{}_{}", d.category, stat), value)),
            );
        }
        entries
    }

    /// Look up one flattened metric, e.g. `class_total_q1`.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(name, _)| name == metric)
            .map(|(_, value)| value)
    }

    /// Same metric names and values, with NaN equal to NaN.
    pub fn same_values(&self, other: &DatasetStatistics) -> bool {
        same_entries(&self.entries(), &other.entries())
    }
}

/// A named, ordered collection of models.
///
/// Statistics are never invalidated automatically: after changing inputs,
/// call [`Dataset::reset_statistics`] and recompute.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    models: Vec<Model>,
    statistics: Option<DatasetStatistics>,
    class_statistics_raw: Option<StereotypeAnalysis>,
    class_statistics_clean: Option<StereotypeAnalysis>,
    relation_statistics_raw: Option<StereotypeAnalysis>,
    relation_statistics_clean: Option<StereotypeAnalysis>,
}

impl Dataset {
    /// Create a dataset, checking that model names are unique and every model
    /// shares the same stereotype keys per entity kind.
    pub fn new(name: impl Into<String>, models: Vec<Model>) -> Result<Self> {
        let name = name.into();

        let mut seen = BTreeSet::new();
        for model in &models {
            if !seen.insert(model.name.as_str()) {
                return Err(StatsError::DuplicateModel {
                    dataset: name,
                    model: model.name.clone(),
                });
            }
        }

        if let Some(first) = models.first() {
            for kind in EntityKind::ALL {
                let expected: Vec<&String> = first.stereotypes(kind).keys().collect();
                for model in &models[1..] {
                    if !model.stereotypes(kind).keys().eq(expected.iter().copied()) {
                        return Err(StatsError::InconsistentStereotypeKeys {
                            dataset: name,
                            model: model.name.clone(),
                            kind,
                        });
                    }
                }
            }
        }

        debug!(dataset = %name, models = models.len(), "Created dataset");
        Ok(Self::from_parts(name, models))
    }

    fn from_parts(name: String, models: Vec<Model>) -> Self {
        Self {
            name,
            models,
            statistics: None,
            class_statistics_raw: None,
            class_statistics_clean: None,
            relation_statistics_raw: None,
            relation_statistics_clean: None,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn num_models(&self) -> usize {
        self.models.len()
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn statistics(&self) -> Option<&DatasetStatistics> {
        self.statistics.as_ref()
    }

    /// Build the per-kind stereotype table.
    pub fn stereotype_table(&self, kind: EntityKind) -> Result<StereotypeTable> {
        StereotypeTable::from_models(&self.name, kind, &self.models)
    }

    /// Aggregate totals, ratios and count distributions over all models.
    ///
    /// Recomputing replaces the previous statistics.
    #[instrument(skip(self, allowlists), fields(dataset = %self.name))]
    pub fn calculate_dataset_statistics(&mut self, allowlists: &StereotypeAllowlists) -> Result<()> {
        let class_table = self.stereotype_table(EntityKind::Class)?;
        let relation_table = self.stereotype_table(EntityKind::Relation)?;

        let classes = ClassRelationMetrics::compute(&class_table, allowlists.for_kind(EntityKind::Class))?;
        let relations =
            ClassRelationMetrics::compute(&relation_table, allowlists.for_kind(EntityKind::Relation))?;

        self.statistics = Some(DatasetStatistics::compute(&classes, &relations));
        info!(dataset = %self.name, models = self.models.len(), "Dataset statistics calculated");
        Ok(())
    }

    /// Compute every model's statistics.
    ///
    /// A failing model is logged and skipped; the names of failed models are
    /// returned.
    pub fn calculate_models_statistics(&mut self, allowlists: &StereotypeAllowlists) -> Vec<String> {
        let mut failed = Vec::new();
        for model in &mut self.models {
            if let Err(e) = model.calculate_statistics(allowlists) {
                error!(dataset = %self.name, model = %model.name, error = %e, "Model statistics failed");
                failed.push(model.name.clone());
            }
        }
        debug!(dataset = %self.name, failed = failed.len(), "Model statistics calculated");
        failed
    }

    /// Compute the four stereotype analyses (class/relation, raw/clean).
    pub fn calculate_stereotype_statistics(&mut self) {
        self.class_statistics_raw = Some(StereotypeAnalysis::compute(&self.models, EntityKind::Class, false));
        self.class_statistics_clean = Some(StereotypeAnalysis::compute(&self.models, EntityKind::Class, true));
        self.relation_statistics_raw =
            Some(StereotypeAnalysis::compute(&self.models, EntityKind::Relation, false));
        self.relation_statistics_clean =
            Some(StereotypeAnalysis::compute(&self.models, EntityKind::Relation, true));
        info!(dataset = %self.name, "Stereotype statistics calculated");
    }

    pub fn stereotype_statistics(&self, kind: EntityKind, clean: bool) -> Option<&StereotypeAnalysis> {
        match (kind, clean) {
            (EntityKind::Class, false) => self.class_statistics_raw.as_ref(),
            (EntityKind::Class, true) => self.class_statistics_clean.as_ref(),
            (EntityKind::Relation, false) => self.relation_statistics_raw.as_ref(),
            (EntityKind::Relation, true) => self.relation_statistics_clean.as_ref(),
        }
    }

    /// Every computed stereotype analysis, in class_raw, class_clean,
    /// relation_raw, relation_clean order.
    pub fn stereotype_analyses(&self) -> impl Iterator<Item = &StereotypeAnalysis> {
        [
            &self.class_statistics_raw,
            &self.class_statistics_clean,
            &self.relation_statistics_raw,
            &self.relation_statistics_clean,
        ]
        .into_iter()
        .flatten()
    }

    /// Clear dataset, model and stereotype statistics.
    pub fn reset_statistics(&mut self) {
        self.statistics = None;
        self.class_statistics_raw = None;
        self.class_statistics_clean = None;
        self.relation_statistics_raw = None;
        self.relation_statistics_clean = None;
        for model in &mut self.models {
            model.reset_statistics();
        }
        debug!(dataset = %self.name, "Statistics reset");
    }

    /// `model, year, total_class_number, total_relation_number`
    pub fn general_data_table(&self) -> Table {
        let mut table = Table::new(["model", "year", "total_class_number", "total_relation_number"]);
        for model in &self.models {
            table.push_row(vec![
                Cell::from(model.name.as_str()),
                Cell::from(model.year),
                Cell::from(model.total_class_number),
                Cell::from(model.total_relation_number),
            ]);
        }
        table
    }

    /// One row per model with the union of its statistic names.
    pub fn models_statistics_table(&self) -> Table {
        let rows: Vec<(String, Vec<(String, f64)>)> = self
            .models
            .iter()
            .map(|m| (m.name.clone(), m.statistics_row()))
            .collect();
        union_table("model", rows.iter().map(|(name, row)| (name.clone(), row.as_slice())))
    }
}
