//! Stereotype usage metrics.
//!
//! A [`StereotypeAnalysis`] summarizes how one entity kind's stereotypes are
//! used across a set of models:
//!
//! - occurrence-wise frequency (total count) and group-wise frequency (number
//!   of models using the stereotype), each ranked descending with ties broken
//!   by stereotype name
//! - global relative frequencies and the ubiquity index
//! - Shannon entropy and Simpson index of each stereotype's spread over models
//! - pairwise Jaccard and Dice similarity of the model sets
//! - Spearman correlation between the two frequency rankings
//!
//! With `filter_reserved` the `none` and `other` pseudo-stereotypes are
//! dropped before anything is computed.

pub mod temporal;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{EntityKind, Model, NONE_KEY, OTHER_KEY};
use crate::stats::similarity::{dice, jaccard};
use crate::stats::{spearman, SpearmanResult};
use crate::table::{Cell, Table};

/// Table names produced by [`StereotypeAnalysis::tables`].
pub const FREQUENCY_ANALYSIS: &str = "frequency_analysis";
pub const RANK_FREQUENCY: &str = "rank_frequency_distribution";
pub const RANK_GROUPWISE_FREQUENCY: &str = "rank_groupwise_frequency_distribution";
pub const DIVERSITY_MEASURES: &str = "diversity_measures";
pub const SIMILARITY_MEASURES: &str = "similarity_measures";
pub const SPEARMAN_CORRELATION: &str = "spearman_correlation";
pub const SPEARMAN_CLASSIFIED: &str = "spearman_correlation_classified";

pub(crate) fn is_reserved(stereotype: &str) -> bool {
    stereotype == NONE_KEY || stereotype == OTHER_KEY
}

/// Occurrence and group frequency of one stereotype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereotypeFrequency {
    pub stereotype: String,
    /// Sum of counts over all models
    pub occurrence: u64,
    /// Number of models with a non-zero count
    pub group: u64,
}

/// One row of a rank distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStereotype {
    /// 1-based position
    pub rank: usize,
    pub stereotype: String,
    pub frequency: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diversity {
    pub shannon_entropy: f64,
    pub simpson_index: f64,
}

impl Diversity {
    /// Diversity of one stereotype's counts across models. NaN when it
    /// never occurs.
    pub fn of_counts(counts: &[u64]) -> Self {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Diversity {
                shannon_entropy: f64::NAN,
                simpson_index: f64::NAN,
            };
        }

        let total = total as f64;
        let mut shannon = 0.0;
        let mut simpson = 0.0;
        for &count in counts.iter().filter(|&&c| c > 0) {
            let p = count as f64 / total;
            shannon -= p * p.ln();
            simpson += p * p;
        }

        Diversity {
            shannon_entropy: shannon,
            simpson_index: simpson,
        }
    }
}

/// Similarity of the model sets of two stereotypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityPair {
    pub first: String,
    pub second: String,
    pub jaccard: f64,
    pub dice: f64,
}

/// Stereotype metrics for one entity kind over one set of models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereotypeAnalysis {
    pub kind: EntityKind,
    pub filter_reserved: bool,
    pub num_models: usize,
    /// In stereotype name order
    pub frequencies: Vec<StereotypeFrequency>,
    pub occurrence_ranking: Vec<RankedStereotype>,
    pub groupwise_ranking: Vec<RankedStereotype>,
    /// Parallel to `frequencies`
    pub diversity: Vec<Diversity>,
    pub similarity: Vec<SimilarityPair>,
    pub spearman: SpearmanResult,
}

impl StereotypeAnalysis {
    pub fn compute(models: &[Model], kind: EntityKind, filter_reserved: bool) -> Self {
        let stereotypes: Vec<String> = models
            .iter()
            .flat_map(|m| m.stereotypes(kind).keys())
            .filter(|name| !(filter_reserved && is_reserved(name)))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // counts[s][m] = count of stereotype s in model m
        let counts: Vec<Vec<u64>> = stereotypes
            .iter()
            .map(|s| {
                models
                    .iter()
                    .map(|m| m.stereotypes(kind).get(s).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        let frequencies: Vec<StereotypeFrequency> = stereotypes
            .iter()
            .zip(&counts)
            .map(|(s, row)| StereotypeFrequency {
                stereotype: s.clone(),
                occurrence: row.iter().sum(),
                group: row.iter().filter(|&&c| c > 0).count() as u64,
            })
            .collect();

        let occurrence_ranking = rank(frequencies.iter().map(|f| (&f.stereotype, f.occurrence)));
        let groupwise_ranking = rank(frequencies.iter().map(|f| (&f.stereotype, f.group)));

        let diversity = counts.iter().map(|row| Diversity::of_counts(row)).collect();

        let model_sets: Vec<BTreeSet<usize>> = counts
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|&(_, &c)| c > 0)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let mut similarity = Vec::new();
        for i in 0..stereotypes.len() {
            for j in (i + 1)..stereotypes.len() {
                similarity.push(SimilarityPair {
                    first: stereotypes[i].clone(),
                    second: stereotypes[j].clone(),
                    jaccard: jaccard(&model_sets[i], &model_sets[j]),
                    dice: dice(&model_sets[i], &model_sets[j]),
                });
            }
        }

        let occurrence: Vec<f64> = frequencies.iter().map(|f| f.occurrence as f64).collect();
        let group: Vec<f64> = frequencies.iter().map(|f| f.group as f64).collect();
        let spearman = spearman(&occurrence, &group);

        tracing::debug!(
            kind = %kind,
            filter_reserved,
            stereotypes = stereotypes.len(),
            models = models.len(),
            "Computed stereotype analysis"
        );

        Self {
            kind,
            filter_reserved,
            num_models: models.len(),
            frequencies,
            occurrence_ranking,
            groupwise_ranking,
            diversity,
            similarity,
            spearman,
        }
    }

    /// Sub-directory name used when the analysis is written out.
    pub fn label(&self) -> String {
        let variant = if self.filter_reserved { "clean" } else { "raw" };
        format!("{}_{}", self.kind, variant)
    }

    pub fn frequency(&self, stereotype: &str) -> Option<&StereotypeFrequency> {
        self.frequencies.iter().find(|f| f.stereotype == stereotype)
    }

    pub fn frequency_analysis_table(&self) -> Table {
        let total_occurrences: u64 = self.frequencies.iter().map(|f| f.occurrence).sum();
        let total_presences: u64 = self.frequencies.iter().map(|f| f.group).sum();

        let mut table = Table::new([
            "Stereotype",
            "Total Frequency",
            "Group Frequency",
            "Global Relative Frequency (Occurrence-wise)",
            "Global Relative Frequency (Group-wise)",
            "Ubiquity Index (Group Frequency per Group)",
        ]);
        for f in &self.frequencies {
            table.push_row(vec![
                Cell::from(f.stereotype.as_str()),
                Cell::from(f.occurrence),
                Cell::from(f.group),
                Cell::from(crate::metrics::ratio(f.occurrence, total_occurrences)),
                Cell::from(crate::metrics::ratio(f.group, total_presences)),
                Cell::from(crate::metrics::ratio(f.group, self.num_models as u64)),
            ]);
        }
        table
    }

    fn ranking_table(ranking: &[RankedStereotype], frequency_header: &str) -> Table {
        let mut table = Table::new(["Rank", "Stereotype", frequency_header]);
        for r in ranking {
            table.push_row(vec![
                Cell::from(r.rank),
                Cell::from(r.stereotype.as_str()),
                Cell::from(r.frequency),
            ]);
        }
        table
    }

    pub fn diversity_table(&self) -> Table {
        let mut table = Table::new(["Stereotype", "Shannon Entropy", "Simpson Index"]);
        for (f, d) in self.frequencies.iter().zip(&self.diversity) {
            table.push_row(vec![
                Cell::from(f.stereotype.as_str()),
                Cell::from(d.shannon_entropy),
                Cell::from(d.simpson_index),
            ]);
        }
        table
    }

    /// Pairs are written as one `Construct Pair` cell, `('a', 'b')`.
    pub fn similarity_table(&self) -> Table {
        let mut table = Table::new(["Construct Pair", "Jaccard Similarity", "Dice Coefficient"]);
        for pair in &self.similarity {
            table.push_row(vec![
                Cell::from(format!("('{}', '{}')", pair.first, pair.second)),
                Cell::from(pair.jaccard),
                Cell::from(pair.dice),
            ]);
        }
        table
    }

    pub fn spearman_table(&self) -> Table {
        let mut table = Table::new(["Metric 1", "Metric 2", "Coefficient", "P-Value", "N"]);
        table.push_row(vec![
            Cell::from("Frequency"),
            Cell::from("Group-wise Frequency"),
            Cell::from(self.spearman.coefficient),
            Cell::from(self.spearman.p_value),
            Cell::from(self.spearman.n),
        ]);
        table
    }

    /// The Spearman result with its strength, direction and significance.
    pub fn spearman_classified_table(&self) -> Table {
        let s = &self.spearman;
        let mut table = Table::new([
            "Metric 1",
            "Metric 2",
            "Coefficient",
            "P-Value",
            "Strength",
            "Direction",
            "Significant",
        ]);
        table.push_row(vec![
            Cell::from("Frequency"),
            Cell::from("Group-wise Frequency"),
            Cell::from(s.coefficient),
            Cell::from(s.p_value),
            Cell::from(s.strength().to_string()),
            Cell::from(s.direction()),
            Cell::from(s.is_significant()),
        ]);
        table
    }

    /// Every analysis table keyed by its output name.
    pub fn tables(&self) -> Vec<(&'static str, Table)> {
        vec![
            (FREQUENCY_ANALYSIS, self.frequency_analysis_table()),
            (
                RANK_FREQUENCY,
                Self::ranking_table(&self.occurrence_ranking, "Frequency"),
            ),
            (
                RANK_GROUPWISE_FREQUENCY,
                Self::ranking_table(&self.groupwise_ranking, "Group-wise Frequency"),
            ),
            (DIVERSITY_MEASURES, self.diversity_table()),
            (SIMILARITY_MEASURES, self.similarity_table()),
            (SPEARMAN_CORRELATION, self.spearman_table()),
        ]
    }
}

/// Rank descending by frequency, ties by name ascending.
fn rank<'a, I>(entries: I) -> Vec<RankedStereotype>
where
    I: IntoIterator<Item = (&'a String, u64)>,
{
    let mut entries: Vec<(&String, u64)> = entries.into_iter().collect();
    entries.sort_by(|(name_a, freq_a), (name_b, freq_b)| {
        freq_b.cmp(freq_a).then_with(|| name_a.cmp(name_b))
    });
    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, frequency))| RankedStereotype {
            rank: i + 1,
            stereotype: name.clone(),
            frequency,
        })
        .collect()
}
