//! CSV persistence of result tables.
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/datasets_statistics.csv
//! <root>/outliers.csv
//! <root>/<dataset>/<dataset>_data.csv
//! <root>/<dataset>/<dataset>_class_data.csv
//! <root>/<dataset>/<dataset>_relation_data.csv
//! <root>/<dataset>/<dataset>_models_statistics.csv
//! <root>/<dataset>/{class,relation}_{raw,clean}/<analysis>.csv
//! <root>/<dataset>/temporal/<kind>_<variant>_{yearly,overall}_relative_frequencies.csv
//! <root>/<dataset>/temporal/models_per_year.csv
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::dataset::cohorts::OutlierPlan;
use crate::dataset::outliers::outliers_table;
use crate::dataset::Dataset;
use crate::model::EntityKind;
use crate::stereotypes::temporal;
use crate::stereotypes::SPEARMAN_CLASSIFIED;
use crate::table::{union_table, Table};

pub const DATASETS_STATISTICS_FILE: &str = "datasets_statistics.csv";
pub const OUTLIERS_FILE: &str = "outliers.csv";

/// Write one table, creating parent directories as needed.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    writer
        .write_record(&table.headers)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    for row in table.rendered_rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    debug!(path = %path.display(), rows = table.len(), "Table written");
    Ok(())
}

/// Write every table of one dataset; returns the paths written.
///
/// Stereotype analyses are written only if they have been computed.
pub fn write_dataset(dataset: &Dataset, output_root: &Path) -> Result<Vec<PathBuf>> {
    let dir = output_root.join(&dataset.name);
    let mut written = Vec::new();
    let mut emit = |path: PathBuf, table: &Table| -> Result<()> {
        write_table(&path, table)?;
        written.push(path);
        Ok(())
    };

    let name = &dataset.name;
    emit(dir.join(format!("{}_data.csv", name)), &dataset.general_data_table())?;
    for kind in EntityKind::ALL {
        let table = dataset.stereotype_table(kind)?.to_table();
        emit(dir.join(format!("{}_{}_data.csv", name, kind)), &table)?;
    }
    emit(
        dir.join(format!("{}_models_statistics.csv", name)),
        &dataset.models_statistics_table(),
    )?;

    for analysis in dataset.stereotype_analyses() {
        let subdir = dir.join(analysis.label());
        for (table_name, table) in analysis.tables() {
            emit(subdir.join(format!("{}.csv", table_name)), &table)?;
        }
        emit(
            subdir.join(format!("{}.csv", SPEARMAN_CLASSIFIED)),
            &analysis.spearman_classified_table(),
        )?;
    }

    let temporal_dir = dir.join("temporal");
    for kind in EntityKind::ALL {
        for clean in [false, true] {
            let variant = if clean { "clean" } else { "raw" };
            emit(
                temporal_dir.join(format!("{}_{}_yearly_relative_frequencies.csv", kind, variant)),
                &temporal::yearly_relative_frequencies(dataset.models(), kind, clean),
            )?;
            emit(
                temporal_dir.join(format!("{}_{}_overall_relative_frequencies.csv", kind, variant)),
                &temporal::overall_relative_frequencies(dataset.models(), kind, clean),
            )?;
        }
    }
    emit(
        temporal_dir.join("models_per_year.csv"),
        &temporal::models_per_year(dataset.models()),
    )?;

    info!(dataset = %dataset.name, files = written.len(), dir = %dir.display(), "Dataset written");
    Ok(written)
}

/// One row per dataset: `dataset`, `num_models`, then the union of every
/// dataset's statistic names. Datasets without statistics get `N/A`.
pub fn datasets_statistics_table(datasets: &[Dataset]) -> Table {
    let rows: Vec<(String, Vec<(String, f64)>)> = datasets
        .iter()
        .map(|d| {
            let mut row = vec![("num_models".to_string(), d.num_models() as f64)];
            if let Some(stats) = d.statistics() {
                row.extend(stats.entries());
            }
            (d.name.clone(), row)
        })
        .collect();
    union_table("dataset", rows.iter().map(|(n, r)| (n.clone(), r.as_slice())))
}

pub fn write_datasets_statistics(datasets: &[Dataset], output_root: &Path) -> Result<PathBuf> {
    let path = output_root.join(DATASETS_STATISTICS_FILE);
    write_table(&path, &datasets_statistics_table(datasets))?;
    info!(path = %path.display(), datasets = datasets.len(), "Combined dataset statistics written");
    Ok(path)
}

pub fn write_outliers(plan: &OutlierPlan, output_root: &Path) -> Result<PathBuf> {
    let path = output_root.join(OUTLIERS_FILE);
    write_table(&path, &outliers_table(plan.records()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StereotypeAllowlists;
    use crate::dataset::tests::dataset_with_class_totals;
    use tempfile::TempDir;

    #[test]
    fn test_write_table_renders_not_available() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("t.csv");
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec!["x".into(), f64::NAN.into()]);

        write_table(&path, &table).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\nx,N/A\n");
    }

    #[test]
    fn test_write_dataset_layout() {
        let dir = TempDir::new().unwrap();
        let allowlists = StereotypeAllowlists::default();
        let mut dataset = dataset_with_class_totals(&[3, 4]);
        dataset.calculate_models_statistics(&allowlists);
        dataset.calculate_stereotype_statistics();

        let written = write_dataset(&dataset, dir.path()).unwrap();

        let root = dir.path().join("test");
        for expected in [
            root.join("test_data.csv"),
            root.join("test_class_data.csv"),
            root.join("test_relation_data.csv"),
            root.join("test_models_statistics.csv"),
            root.join("class_raw").join("frequency_analysis.csv"),
            root.join("relation_clean").join("spearman_correlation_classified.csv"),
            root.join("temporal").join("models_per_year.csv"),
        ] {
            assert!(written.contains(&expected), "missing {}", expected.display());
            assert!(expected.exists());
        }
        let class_data = fs::read_to_string(root.join("test_class_data.csv")).unwrap();
        assert_eq!(class_data, "model,kind,none,other\nm1,3,0,0\nm2,4,0,0\n");
    }

    #[test]
    fn test_datasets_statistics_with_missing_statistics() {
        let allowlists = StereotypeAllowlists::default();
        let mut computed = dataset_with_class_totals(&[3, 4]);
        computed.calculate_dataset_statistics(&allowlists).unwrap();
        let pending = computed.fork_without_outliers(&["m1"]);

        let table = datasets_statistics_table(&[computed, pending]);
        let rows = table.rendered_rows();

        assert_eq!(table.headers[..3], ["dataset", "num_models", "total_classes"]);
        assert_eq!(rows[0][..3], ["test", "2", "7"]);
        assert_eq!(rows[1][..3], ["test_filtered", "1", "N/A"]);
    }
}
