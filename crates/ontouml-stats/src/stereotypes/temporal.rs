//! Stereotype usage over time.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{EntityKind, Model};
use crate::table::{Cell, Table};

use super::is_reserved;

/// Stereotype counts summed per year, years ascending.
struct YearlyCounts {
    stereotypes: Vec<String>,
    years: BTreeMap<i32, Vec<u64>>,
}

impl YearlyCounts {
    fn collect(models: &[Model], kind: EntityKind, clean: bool) -> Self {
        let stereotypes: Vec<String> = models
            .iter()
            .flat_map(|m| m.stereotypes(kind).keys())
            .filter(|name| !(clean && is_reserved(name)))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut years: BTreeMap<i32, Vec<u64>> = BTreeMap::new();
        for model in models {
            let sums = years
                .entry(model.year)
                .or_insert_with(|| vec![0; stereotypes.len()]);
            let counts = model.stereotypes(kind);
            for (sum, name) in sums.iter_mut().zip(&stereotypes) {
                *sum += counts.get(name).copied().unwrap_or(0);
            }
        }

        Self { stereotypes, years }
    }

    fn table_with<F>(&self, divisor: F) -> Table
    where
        F: Fn(&[u64]) -> u64,
    {
        let mut headers = vec!["year".to_string()];
        headers.extend(self.stereotypes.iter().cloned());
        let mut table = Table::new(headers);

        for (year, sums) in &self.years {
            let denominator = divisor(sums);
            let mut row = vec![Cell::from(*year)];
            row.extend(
                sums.iter()
                    .map(|&count| Cell::from(crate::metrics::ratio(count, denominator))),
            );
            table.push_row(row);
        }
        table
    }
}

/// Share of each stereotype within each year; every row sums to 1.
///
/// A year whose stereotypes never occur yields NaN cells.
pub fn yearly_relative_frequencies(models: &[Model], kind: EntityKind, clean: bool) -> Table {
    YearlyCounts::collect(models, kind, clean).table_with(|sums| sums.iter().sum())
}

/// Yearly counts divided by the grand total over every year, so the whole
/// table sums to 1.
pub fn overall_relative_frequencies(models: &[Model], kind: EntityKind, clean: bool) -> Table {
    let yearly = YearlyCounts::collect(models, kind, clean);
    let grand_total: u64 = yearly.years.values().flatten().sum();
    yearly.table_with(|_| grand_total)
}

/// Number of models per year, years ascending.
pub fn models_per_year(models: &[Model]) -> Table {
    let mut per_year: BTreeMap<i32, u64> = BTreeMap::new();
    for model in models {
        *per_year.entry(model.year).or_default() += 1;
    }

    let mut table = Table::new(["year", "models"]);
    for (year, count) in per_year {
        table.push_row(vec![Cell::from(year), Cell::from(count)]);
    }
    table
}
