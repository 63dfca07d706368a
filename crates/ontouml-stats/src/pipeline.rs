//! End-to-end analysis run.
//!
//! load → cohorts → dataset and model statistics → outliers → filtered
//! forks → statistics on forks → stereotype statistics → CSV output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::{Config, StereotypeAllowlists};
use crate::dataset::cohorts::{standard_datasets, OutlierPlan};
use crate::dataset::Dataset;
use crate::io::{loader, writer};
use crate::model::Model;

/// Datasets and outliers produced by [`analyze`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The standard cohorts followed by their filtered forks
    pub datasets: Vec<Dataset>,
    pub plan: OutlierPlan,
    /// `(dataset, model)` pairs whose per-model statistics failed
    pub failed_models: Vec<(String, String)>,
}

impl Analysis {
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }
}

fn compute_statistics(
    datasets: &mut [Dataset],
    allowlists: &StereotypeAllowlists,
    failed: &mut Vec<(String, String)>,
) -> Result<()> {
    for dataset in datasets {
        dataset
            .calculate_dataset_statistics(allowlists)
            .with_context(|| format!("Failed to calculate statistics for dataset '{}'", dataset.name))?;
        for model in dataset.calculate_models_statistics(allowlists) {
            failed.push((dataset.name.clone(), model));
        }
    }
    Ok(())
}

/// Run every in-memory step on an already loaded model list.
#[instrument(skip(models, config), fields(models = models.len()))]
pub fn analyze(models: &[Model], config: &Config) -> Result<Analysis> {
    let allowlists = config.allowlists();
    let mut failed_models = Vec::new();

    let mut datasets = standard_datasets(models, config.split_year).context("Failed to build cohorts")?;
    compute_statistics(&mut datasets, &allowlists, &mut failed_models)?;

    let plan = OutlierPlan::identify(&datasets).context("Failed to identify outliers")?;
    let mut forks = plan.fork_all(&datasets);
    compute_statistics(&mut forks, &allowlists, &mut failed_models)?;

    datasets.extend(forks);
    for dataset in &mut datasets {
        dataset.calculate_stereotype_statistics();
    }

    if !failed_models.is_empty() {
        warn!(count = failed_models.len(), "Some model statistics could not be calculated");
    }
    info!(datasets = datasets.len(), outliers = plan.records().len(), "Analysis complete");

    Ok(Analysis {
        datasets,
        plan,
        failed_models,
    })
}

/// Persist every table of an analysis; returns the number of files written.
pub fn write_analysis(analysis: &Analysis, output_root: &Path) -> Result<usize> {
    let mut files = 0;
    for dataset in &analysis.datasets {
        files += writer::write_dataset(dataset, output_root)?.len();
    }
    writer::write_datasets_statistics(&analysis.datasets, output_root)?;
    writer::write_outliers(&analysis.plan, output_root)?;
    Ok(files + 2)
}

/// Headline numbers of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    pub num_models: usize,
    pub total_classes: Option<f64>,
    pub total_relations: Option<f64>,
    pub class_to_relation_ratio: Option<f64>,
    pub class_total_median: Option<f64>,
    pub relation_total_median: Option<f64>,
}

impl DatasetSummary {
    fn from_dataset(dataset: &Dataset) -> Self {
        let metric = |name: &str| {
            dataset
                .statistics()
                .and_then(|s| s.get(name))
                .filter(|v| !v.is_nan())
        };
        Self {
            name: dataset.name.clone(),
            num_models: dataset.num_models(),
            total_classes: metric("total_classes"),
            total_relations: metric("total_relations"),
            class_to_relation_ratio: metric("class_to_relation_ratio"),
            class_total_median: metric("class_total_median"),
            relation_total_median: metric("relation_total_median"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlierEntry {
    pub dataset: String,
    pub model: String,
    pub reason: String,
}

/// Serializable outcome of [`run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: String,
    pub catalog_path: String,
    pub output_root: String,
    pub models_loaded: usize,
    pub datasets: Vec<DatasetSummary>,
    pub outliers: Vec<OutlierEntry>,
    /// `dataset/model`
    pub failed_models: Vec<String>,
    pub files_written: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn from_analysis(analysis: &Analysis, config: &Config, models_loaded: usize) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            catalog_path: config.catalog_path.display().to_string(),
            output_root: config.output_root.display().to_string(),
            models_loaded,
            datasets: analysis.datasets.iter().map(DatasetSummary::from_dataset).collect(),
            outliers: analysis
                .plan
                .records()
                .into_iter()
                .map(|(dataset, record)| OutlierEntry {
                    dataset: dataset.to_string(),
                    model: record.model.clone(),
                    reason: record.kind.to_string(),
                })
                .collect(),
            failed_models: analysis
                .failed_models
                .iter()
                .map(|(dataset, model)| format!("{}/{}", dataset, model))
                .collect(),
            files_written: 0,
            duration_ms: 0,
        }
    }

    /// True when every model's statistics were computed.
    pub fn is_clean(&self) -> bool {
        self.failed_models.is_empty()
    }
}

/// Load, analyze and write everything described by `config`.
#[instrument(skip(config), fields(catalog = %config.catalog_path.display()))]
pub fn run(config: &Config) -> Result<RunSummary> {
    let start = Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();
    info!(output = %config.output_root.display(), "Starting analysis run");

    let models = loader::load_models(config)?;
    let analysis = analyze(&models, config)?;
    let files = write_analysis(&analysis, &config.output_root)?;

    let mut summary = RunSummary::from_analysis(&analysis, config, models.len());
    summary.started_at = started_at;
    summary.files_written = files;
    summary.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        datasets = summary.datasets.len(),
        outliers = summary.outliers.len(),
        files = summary.files_written,
        duration_ms = summary.duration_ms,
        "Analysis run complete"
    );
    Ok(summary)
}
