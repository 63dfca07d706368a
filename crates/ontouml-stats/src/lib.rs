//! Statistics and outlier analysis for OntoUML model catalogs
//!
//! This crate computes descriptive statistics over a catalog of OntoUML
//! models annotated with class and relation stereotype counts, detects
//! anomalously sized models and produces outlier-free datasets.
//!
//! # Features
//!
//! - **Per-model metrics**: stereotyped / OntoUML-valid partitions and ratios
//! - **Dataset statistics**: count, mean, std, quartiles and IQR of every count distribution
//! - **Outlier detection**: Tukey fences on class and relation counts, with filtered forks
//! - **Stereotype metrics**: rank distributions, ubiquity, diversity, similarity, Spearman
//! - **Temporal statistics**: yearly and overall relative stereotype frequencies
//! - **Multiple Output Formats**: CSV tables plus Console and JSON run reports
//!
//! # Example
//!
//! ```no_run
//! use ontouml_stats::{Config, pipeline, reporter::{Reporter, OutputFormat}};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("analysis.toml")?;
//! let summary = pipeline::run(&config)?;
//!
//! Reporter::new(OutputFormat::Console).report(&summary)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! catalog_path = "outputs/01_loaded_data"
//! output_root = "outputs/02_datasets"
//! split_year = 2018
//! stereotype_allowlist_classes = ["kind", "subkind", "role", "phase"]
//!
//! [inputs]
//! models_file = "models_data.csv"
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod reporter;
pub mod stats;
pub mod stereotypes;
pub mod table;

// Re-export main types for convenience
pub use config::{Config, StereotypeAllowlists};
pub use dataset::{Dataset, DatasetStatistics, OutlierKind, OutlierRecord};
pub use error::{Result, StatsError};
pub use model::{EntityKind, Model, ModelMetric, StereotypeCounts};
pub use pipeline::RunSummary;
pub use reporter::{OutputFormat, Reporter};
pub use stereotypes::StereotypeAnalysis;
pub use table::{Cell, Table};
