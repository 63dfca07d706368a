//! Console reporter for run summaries
//!
//! Provides human-readable output with ASCII tables.

use anyhow::Result;
use std::fmt::Write;

use crate::pipeline::{DatasetSummary, RunSummary};
use crate::table::NOT_AVAILABLE;

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format(summary: &RunSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                       ONTOUML CATALOG STATISTICS                         ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Catalog:   {}", summary.catalog_path)?;
        writeln!(output, "Output:    {}", summary.output_root)?;
        writeln!(output, "Started:   {}", summary.started_at)?;
        writeln!(output, "Duration:  {}ms", summary.duration_ms)?;
        writeln!(output, "Models:    {}", summary.models_loaded)?;
        writeln!(output, "Files:     {}", summary.files_written)?;
        writeln!(output)?;

        writeln!(output, "  ┌──────────────────────────────────────────┬────────┬──────────┬──────────┬─────────┐")?;
        writeln!(output, "  │ Dataset                                  │ Models │ Classes  │ Relations│ C/R     │")?;
        writeln!(output, "  ├──────────────────────────────────────────┼────────┼──────────┼──────────┼─────────┤")?;
        for dataset in &summary.datasets {
            Self::format_dataset_row(&mut output, dataset)?;
        }
        writeln!(output, "  └──────────────────────────────────────────┴────────┴──────────┴──────────┴─────────┘")?;
        writeln!(output)?;

        if summary.outliers.is_empty() {
            writeln!(output, "Outliers: none")?;
        } else {
            writeln!(output, "Outliers:")?;
            for outlier in &summary.outliers {
                writeln!(output, "  • {} / {} ({})", outlier.dataset, outlier.model, outlier.reason)?;
            }
        }

        writeln!(output)?;
        writeln!(output, "──────────────────────────────────────────────────────────────────────────────")?;
        let status_symbol = if summary.is_clean() { "✓" } else { "✗" };
        writeln!(
            output,
            "Model statistics: {} {} failed",
            status_symbol,
            summary.failed_models.len()
        )?;
        for failed in &summary.failed_models {
            writeln!(output, "  ✗ {}", failed)?;
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_dataset_row(output: &mut String, dataset: &DatasetSummary) -> Result<()> {
        let format_value = |v: Option<f64>, precision: usize| -> String {
            match v {
                Some(v) => format!("{:.*}", precision, v),
                None => NOT_AVAILABLE.to_string(),
            }
        };

        writeln!(
            output,
            "  │ {:<40} │ {:>6} │ {:>8} │ {:>8} │ {:>7} │",
            dataset.name,
            dataset.num_models,
            format_value(dataset.total_classes, 0),
            format_value(dataset.total_relations, 0),
            format_value(dataset.class_to_relation_ratio, 2)
        )?;
        Ok(())
    }
}
