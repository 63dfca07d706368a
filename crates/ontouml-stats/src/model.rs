//! One OntoUML model and its per-model statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::StereotypeAllowlists;
use crate::error::{Result, StatsError};
use crate::metrics::{EntityTotals, Ratios};
use crate::stats::same_entries;

/// Constructs carrying no stereotype.
pub const NONE_KEY: &str = "none";
/// Constructs whose stereotype is outside the controlled vocabulary.
pub const OTHER_KEY: &str = "other";

/// Stereotype name to occurrence count.
pub type StereotypeCounts = BTreeMap<String, u64>;

/// The two construct kinds whose stereotypes are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Relation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Class, EntityKind::Relation];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Relation => "relation",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Class => "classes",
            EntityKind::Relation => "relations",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-model metric names. Declaration order is output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelMetric {
    TotalClasses,
    StereotypedClasses,
    NonStereotypedClasses,
    OntoumlClasses,
    NonOntoumlClasses,
    DistinctClassStereotypes,
    TotalRelations,
    StereotypedRelations,
    NonStereotypedRelations,
    OntoumlRelations,
    NonOntoumlRelations,
    DistinctRelationStereotypes,
    ClassToRelationRatio,
    StereotypedClassToRelationRatio,
    NonStereotypedClassToRelationRatio,
    OntoumlClassToRelationRatio,
    NonOntoumlClassToRelationRatio,
    StereotypedClassRatio,
    NonStereotypedClassRatio,
    OntoumlClassRatio,
    NonOntoumlClassRatio,
    StereotypedRelationRatio,
    NonStereotypedRelationRatio,
    OntoumlRelationRatio,
    NonOntoumlRelationRatio,
}

impl ModelMetric {
    pub fn name(&self) -> &'static str {
        match self {
            ModelMetric::TotalClasses => "total_classes",
            ModelMetric::StereotypedClasses => "stereotyped_classes",
            ModelMetric::NonStereotypedClasses => "non_stereotyped_classes",
            ModelMetric::OntoumlClasses => "ontouml_classes",
            ModelMetric::NonOntoumlClasses => "non_ontouml_classes",
            ModelMetric::DistinctClassStereotypes => "distinct_class_stereotypes",
            ModelMetric::TotalRelations => "total_relations",
            ModelMetric::StereotypedRelations => "stereotyped_relations",
            ModelMetric::NonStereotypedRelations => "non_stereotyped_relations",
            ModelMetric::OntoumlRelations => "ontouml_relations",
            ModelMetric::NonOntoumlRelations => "non_ontouml_relations",
            ModelMetric::DistinctRelationStereotypes => "distinct_relation_stereotypes",
            ModelMetric::ClassToRelationRatio => "class_to_relation_ratio",
            ModelMetric::StereotypedClassToRelationRatio => "stereotyped_class_to_relation_ratio",
            ModelMetric::NonStereotypedClassToRelationRatio => {
                "non_stereotyped_class_to_relation_ratio"
            }
            ModelMetric::OntoumlClassToRelationRatio => "ontouml_class_to_relation_ratio",
            ModelMetric::NonOntoumlClassToRelationRatio => "non_ontouml_class_to_relation_ratio",
            ModelMetric::StereotypedClassRatio => "stereotyped_class_ratio",
            ModelMetric::NonStereotypedClassRatio => "non_stereotyped_class_ratio",
            ModelMetric::OntoumlClassRatio => "ontouml_class_ratio",
            ModelMetric::NonOntoumlClassRatio => "non_ontouml_class_ratio",
            ModelMetric::StereotypedRelationRatio => "stereotyped_relation_ratio",
            ModelMetric::NonStereotypedRelationRatio => "non_stereotyped_relation_ratio",
            ModelMetric::OntoumlRelationRatio => "ontouml_relation_ratio",
            ModelMetric::NonOntoumlRelationRatio => "non_ontouml_relation_ratio",
        }
    }

    fn totals_for(kind: EntityKind) -> [ModelMetric; 6] {
        match kind {
            EntityKind::Class => [
                ModelMetric::TotalClasses,
                ModelMetric::StereotypedClasses,
                ModelMetric::NonStereotypedClasses,
                ModelMetric::OntoumlClasses,
                ModelMetric::NonOntoumlClasses,
                ModelMetric::DistinctClassStereotypes,
            ],
            EntityKind::Relation => [
                ModelMetric::TotalRelations,
                ModelMetric::StereotypedRelations,
                ModelMetric::NonStereotypedRelations,
                ModelMetric::OntoumlRelations,
                ModelMetric::NonOntoumlRelations,
                ModelMetric::DistinctRelationStereotypes,
            ],
        }
    }
}

impl fmt::Display for ModelMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-model statistics keyed by [`ModelMetric`].
pub type ModelStatistics = BTreeMap<ModelMetric, f64>;

/// One ontology model from the catalog.
///
/// The derived `PartialEq` compares statistics with IEEE equality, so a model
/// holding a NaN ratio never equals itself. [`Model::same_statistics`] treats
/// NaN as equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub year: i32,
    pub is_classroom: bool,
    pub total_class_number: u64,
    pub total_relation_number: u64,
    class_stereotypes: StereotypeCounts,
    relation_stereotypes: StereotypeCounts,
    #[serde(default)]
    statistics: ModelStatistics,
}

impl Model {
    /// Create a model whose totals are the sums of its stereotype counts.
    ///
    /// # Errors
    ///
    /// [`StatsError::MissingReservedKey`] if either map lacks `none` or `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontouml_stats::model::{Model, StereotypeCounts};
    ///
    /// let classes: StereotypeCounts =
    ///     [("kind", 3), ("role", 1), ("none", 1), ("other", 0)]
    ///         .into_iter()
    ///         .map(|(k, v)| (k.to_string(), v))
    ///         .collect();
    /// let relations: StereotypeCounts = [("none", 2), ("other", 0)]
    ///     .into_iter()
    ///     .map(|(k, v)| (k.to_string(), v))
    ///     .collect();
    ///
    /// let model = Model::new("m1", 2020, false, classes, relations).unwrap();
    /// assert_eq!(model.total_class_number, 5);
    /// assert_eq!(model.total_relation_number, 2);
    /// ```
    pub fn new(
        name: impl Into<String>,
        year: i32,
        is_classroom: bool,
        class_stereotypes: StereotypeCounts,
        relation_stereotypes: StereotypeCounts,
    ) -> Result<Self> {
        let name = name.into();
        for (kind, counts) in [
            (EntityKind::Class, &class_stereotypes),
            (EntityKind::Relation, &relation_stereotypes),
        ] {
            for key in [NONE_KEY, OTHER_KEY] {
                if !counts.contains_key(key) {
                    return Err(StatsError::MissingReservedKey {
                        model: name,
                        kind,
                        key: key.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            total_class_number: class_stereotypes.values().sum(),
            total_relation_number: relation_stereotypes.values().sum(),
            name,
            year,
            is_classroom,
            class_stereotypes,
            relation_stereotypes,
            statistics: ModelStatistics::new(),
        })
    }

    /// Override the totals with the catalog's independently counted ones.
    ///
    /// A disagreement with the stereotype sums is reported by
    /// [`Model::validate`] and [`Model::calculate_statistics`].
    pub fn with_totals(mut self, total_class_number: u64, total_relation_number: u64) -> Self {
        self.total_class_number = total_class_number;
        self.total_relation_number = total_relation_number;
        self
    }

    pub fn stereotypes(&self, kind: EntityKind) -> &StereotypeCounts {
        match kind {
            EntityKind::Class => &self.class_stereotypes,
            EntityKind::Relation => &self.relation_stereotypes,
        }
    }

    pub fn total(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Class => self.total_class_number,
            EntityKind::Relation => self.total_relation_number,
        }
    }

    /// Classes per relation, NaN for a model without relations.
    pub fn class_relation_ratio(&self) -> f64 {
        crate::metrics::ratio(self.total_class_number, self.total_relation_number)
    }

    pub fn statistics(&self) -> &ModelStatistics {
        &self.statistics
    }

    pub fn statistic(&self, metric: ModelMetric) -> Option<f64> {
        self.statistics.get(&metric).copied()
    }

    /// Statistics as `(name, value)` pairs in metric order.
    pub fn statistics_row(&self) -> Vec<(String, f64)> {
        self.statistics
            .iter()
            .map(|(metric, &value)| (metric.name().to_string(), value))
            .collect()
    }

    /// Same computed metrics and values as `other`, with NaN equal to NaN.
    pub fn same_statistics(&self, other: &Model) -> bool {
        same_entries(&self.statistics_row(), &other.statistics_row())
    }

    pub fn reset_statistics(&mut self) {
        self.statistics.clear();
    }

    /// Check that stereotype counts sum to the declared totals.
    pub fn validate(&self) -> Result<()> {
        for kind in EntityKind::ALL {
            self.validate_kind(kind)?;
        }
        Ok(())
    }

    fn validate_kind(&self, kind: EntityKind) -> Result<()> {
        let actual: u64 = self.stereotypes(kind).values().sum();
        let expected = self.total(kind);
        if actual != expected {
            return Err(StatsError::TotalMismatch {
                model: self.name.clone(),
                kind,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Recompute this model's statistics from scratch.
    ///
    /// Each entity kind is validated independently: a kind whose counts do
    /// not sum to its total is skipped (its metrics stay absent), as are the
    /// ratios, and the first violation is returned after the rest has been
    /// computed.
    pub fn calculate_statistics(&mut self, allowlists: &StereotypeAllowlists) -> Result<()> {
        self.statistics.clear();

        let mut first_error = None;
        let mut totals = BTreeMap::new();

        for kind in EntityKind::ALL {
            if let Err(e) = self.validate_kind(kind) {
                first_error.get_or_insert(e);
                continue;
            }

            let counts = self.stereotypes(kind);
            let entity = EntityTotals::from_counts(counts, allowlists.for_kind(kind));
            let distinct = counts
                .iter()
                .filter(|&(name, &count)| name.as_str() != NONE_KEY && count > 0)
                .count();

            let [total, stereotyped, non_stereotyped, ontouml, non_ontouml, distinct_key] =
                ModelMetric::totals_for(kind);
            self.statistics.insert(total, entity.total as f64);
            self.statistics.insert(stereotyped, entity.stereotyped as f64);
            self.statistics.insert(non_stereotyped, entity.non_stereotyped as f64);
            self.statistics.insert(ontouml, entity.ontouml as f64);
            self.statistics.insert(non_ontouml, entity.non_ontouml as f64);
            self.statistics.insert(distinct_key, distinct as f64);

            totals.insert(kind, entity);
        }

        if let (Some(classes), Some(relations)) = (
            totals.get(&EntityKind::Class),
            totals.get(&EntityKind::Relation),
        ) {
            let ratios = Ratios::calculate(classes, relations);
            let pairs = [
                (ModelMetric::ClassToRelationRatio, ratios.class_to_relation),
                (
                    ModelMetric::StereotypedClassToRelationRatio,
                    ratios.stereotyped_class_to_relation,
                ),
                (
                    ModelMetric::NonStereotypedClassToRelationRatio,
                    ratios.non_stereotyped_class_to_relation,
                ),
                (
                    ModelMetric::OntoumlClassToRelationRatio,
                    ratios.ontouml_class_to_relation,
                ),
                (
                    ModelMetric::NonOntoumlClassToRelationRatio,
                    ratios.non_ontouml_class_to_relation,
                ),
                (ModelMetric::StereotypedClassRatio, ratios.stereotyped_class),
                (ModelMetric::NonStereotypedClassRatio, ratios.non_stereotyped_class),
                (ModelMetric::OntoumlClassRatio, ratios.ontouml_class),
                (ModelMetric::NonOntoumlClassRatio, ratios.non_ontouml_class),
                (ModelMetric::StereotypedRelationRatio, ratios.stereotyped_relation),
                (
                    ModelMetric::NonStereotypedRelationRatio,
                    ratios.non_stereotyped_relation,
                ),
                (ModelMetric::OntoumlRelationRatio, ratios.ontouml_relation),
                (ModelMetric::NonOntoumlRelationRatio, ratios.non_ontouml_relation),
            ];
            self.statistics.extend(pairs);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
