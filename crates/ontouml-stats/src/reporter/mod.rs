//! Run summary reporting
//!
//! The CSV tables are the primary output of a run; this module renders the
//! [`RunSummary`] that accompanies them.
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable format, compact or pretty-printed
//! - **Console**: Human-readable overview with a per-dataset table
//!
//! # Example
//!
//! ```no_run
//! use ontouml_stats::reporter::{Reporter, OutputFormat};
//! use ontouml_stats::RunSummary;
//!
//! # fn example(summary: RunSummary) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&summary)?;
//!
//! Reporter::new(OutputFormat::JsonPretty)
//!     .write_to_file(&summary, "run_summary.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::pipeline::RunSummary;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console output with tables
    #[default]
    Console,
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report to stdout
    pub fn report(&self, summary: &RunSummary) -> Result<()> {
        let output = self.format_summary(summary)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, summary: &RunSummary, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_summary(summary)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(summary, false),
            OutputFormat::JsonPretty => JsonReporter::format(summary, true),
            OutputFormat::Console => ConsoleReporter::format(summary),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::{DatasetSummary, OutlierEntry};

    pub(crate) fn create_test_summary() -> RunSummary {
        RunSummary {
            started_at: "2024-01-01T00:00:00+00:00".to_string(),
            catalog_path: "outputs/01_loaded_data".to_string(),
            output_root: "outputs/02_datasets".to_string(),
            models_loaded: 5,
            datasets: vec![
                DatasetSummary {
                    name: "ontouml_all".to_string(),
                    num_models: 5,
                    total_classes: Some(146.0),
                    total_relations: Some(25.0),
                    class_to_relation_ratio: Some(5.5),
                    class_total_median: Some(12.0),
                    relation_total_median: Some(5.0),
                },
                DatasetSummary {
                    name: "ontouml_classroom".to_string(),
                    num_models: 0,
                    total_classes: Some(0.0),
                    total_relations: Some(0.0),
                    class_to_relation_ratio: None,
                    class_total_median: None,
                    relation_total_median: None,
                },
            ],
            outliers: vec![OutlierEntry {
                dataset: "ontouml_all".to_string(),
                model: "m5".to_string(),
                reason: "class".to_string(),
            }],
            failed_models: Vec::new(),
            files_written: 42,
            duration_ms: 120,
        }
    }

    #[test]
    fn test_reporter_json_format() {
        let reporter = Reporter::new(OutputFormat::Json);
        let output = reporter.format_summary(&create_test_summary()).unwrap();

        assert!(output.contains("ontouml_all"));
        assert!(output.contains("\"models_loaded\":5"));
    }

    #[test]
    fn test_reporter_console_format() {
        let reporter = Reporter::new(OutputFormat::Console);
        let output = reporter.format_summary(&create_test_summary()).unwrap();

        assert!(output.contains("ontouml_classroom"));
        assert!(output.contains("m5"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&create_test_summary(), &path)
            .unwrap();

        let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, create_test_summary());
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::Console);
    }
}
