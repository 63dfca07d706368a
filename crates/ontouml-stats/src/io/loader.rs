//! CSV ingestion of the catalog query results.
//!
//! Three files are required (`models_data.csv` and one stereotype-count file
//! per entity kind); a fourth with independently counted totals is optional.
//! When the totals are known and a stereotype file has no `none` column, the
//! unstereotyped count is derived as the total minus every other column.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::model::{EntityKind, Model, StereotypeCounts, NONE_KEY, OTHER_KEY};

/// One row of `models_data.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRecord {
    pub name: String,
    pub year: i32,
    pub is_classroom: bool,
}

#[derive(Debug, Deserialize)]
struct RawModelRow {
    model: String,
    year: String,
    is_classroom: String,
}

/// Independently counted construct totals of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTotals {
    pub total_class_number: u64,
    pub total_relation_number: u64,
}

impl ModelTotals {
    fn for_kind(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Class => self.total_class_number,
            EntityKind::Relation => self.total_relation_number,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTotalsRow {
    model: String,
    total_class_number: u64,
    total_relation_number: u64,
}

/// A `model` column plus one count column per stereotype.
#[derive(Debug, Clone, PartialEq)]
pub struct StereotypeMatrix {
    pub columns: Vec<String>,
    pub rows: BTreeMap<String, Vec<u64>>,
}

/// Accepts a bare integer, an ISO date or an RFC 3339 timestamp.
///
/// # Examples
///
/// ```
/// use ontouml_stats::io::loader::parse_year;
///
/// assert_eq!(parse_year("2019"), Some(2019));
/// assert_eq!(parse_year("2016-05-01"), Some(2016));
/// assert_eq!(parse_year("2021-03-04T10:00:00Z"), Some(2021));
/// assert_eq!(parse_year("soon"), None);
/// ```
pub fn parse_year(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.year());
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.year())
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" | "1" => Some(true),
        "false" | "False" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

/// Counts may be written as floats by upstream tooling (`3.0`).
fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(count) = value.parse::<u64>() {
        return Some(count);
    }
    let float = value.parse::<f64>().ok()?;
    if float >= 0.0 && float.fract() == 0.0 {
        Some(float as u64)
    } else {
        None
    }
}

pub fn read_model_records(path: &Path) -> Result<Vec<ModelRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open models file: {}", path.display()))?;

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RawModelRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed row {} in {}", line + 1, path.display()))?;
        let Some(year) = parse_year(&row.year) else {
            bail!("Model '{}' has an unreadable year '{}'", row.model, row.year);
        };
        let Some(is_classroom) = parse_bool(&row.is_classroom) else {
            bail!(
                "Model '{}' has an unreadable is_classroom value '{}'",
                row.model,
                row.is_classroom
            );
        };
        records.push(ModelRecord {
            name: row.model,
            year,
            is_classroom,
        });
    }

    debug!(path = %path.display(), models = records.len(), "Read model records");
    Ok(records)
}

pub fn read_stereotype_matrix(path: &Path) -> Result<StereotypeMatrix> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open stereotype file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    let Some(model_idx) = headers.iter().position(|h| h == "model") else {
        bail!("{} has no 'model' column", path.display());
    };
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != model_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = BTreeMap::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed record in {}", path.display()))?;
        let model = record.get(model_idx).unwrap_or_default().to_string();

        let mut counts = Vec::with_capacity(columns.len());
        for (i, field) in record.iter().enumerate().filter(|&(i, _)| i != model_idx) {
            let Some(count) = parse_count(field) else {
                bail!(
                    "Model '{}' has a non-count value '{}' in column '{}' of {}",
                    model,
                    field,
                    headers.get(i).unwrap_or_default(),
                    path.display()
                );
            };
            counts.push(count);
        }
        counts.resize(columns.len(), 0);

        if rows.insert(model.clone(), counts).is_some() {
            warn!(model = %model, path = %path.display(), "Duplicate model row; keeping the last one");
        }
    }

    debug!(path = %path.display(), stereotypes = columns.len(), models = rows.len(), "Read stereotype matrix");
    Ok(StereotypeMatrix { columns, rows })
}

pub fn read_totals(path: &Path) -> Result<BTreeMap<String, ModelTotals>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open totals file: {}", path.display()))?;

    let mut totals = BTreeMap::new();
    for row in reader.deserialize::<RawTotalsRow>() {
        let row = row.with_context(|| format!("Malformed row in {}", path.display()))?;
        totals.insert(
            row.model,
            ModelTotals {
                total_class_number: row.total_class_number,
                total_relation_number: row.total_relation_number,
            },
        );
    }
    Ok(totals)
}

/// Stereotype counts of one model, with the reserved keys filled in.
fn model_counts(
    model: &str,
    kind: EntityKind,
    matrix: &StereotypeMatrix,
    total: Option<u64>,
) -> StereotypeCounts {
    let mut counts: StereotypeCounts = match matrix.rows.get(model) {
        Some(row) => matrix.columns.iter().cloned().zip(row.iter().copied()).collect(),
        None => {
            warn!(model, kind = %kind, "Model missing from stereotype file; using zero counts");
            matrix.columns.iter().map(|c| (c.clone(), 0)).collect()
        }
    };

    counts.entry(OTHER_KEY.to_string()).or_insert(0);

    if !counts.contains_key(NONE_KEY) {
        let stereotyped: u64 = counts.values().sum();
        let none = match total {
            Some(total) if total >= stereotyped => total - stereotyped,
            Some(total) => {
                warn!(
                    model,
                    kind = %kind,
                    total,
                    stereotyped,
                    "Stereotype counts exceed the declared total; clamping 'none' to 0"
                );
                0
            }
            None => 0,
        };
        counts.insert(NONE_KEY.to_string(), none);
    }
    counts
}

/// Assemble models from already-read inputs, in `records` order.
pub fn build_models(
    records: &[ModelRecord],
    classes: &StereotypeMatrix,
    relations: &StereotypeMatrix,
    totals: Option<&BTreeMap<String, ModelTotals>>,
) -> Result<Vec<Model>> {
    let mut models = Vec::with_capacity(records.len());
    for record in records {
        let model_totals = totals.and_then(|t| t.get(&record.name));
        if totals.is_some() && model_totals.is_none() {
            warn!(model = %record.name, "Model missing from totals file; using stereotype sums");
        }
        let total = |kind| model_totals.map(|t| t.for_kind(kind));

        let class_counts = model_counts(&record.name, EntityKind::Class, classes, total(EntityKind::Class));
        let relation_counts =
            model_counts(&record.name, EntityKind::Relation, relations, total(EntityKind::Relation));

        let mut model = Model::new(
            record.name.clone(),
            record.year,
            record.is_classroom,
            class_counts,
            relation_counts,
        )?;
        if let Some(t) = model_totals {
            model = model.with_totals(t.total_class_number, t.total_relation_number);
        }
        models.push(model);
    }
    Ok(models)
}

/// Load every model named in the models file.
pub fn load_models(config: &Config) -> Result<Vec<Model>> {
    let records = read_model_records(&config.models_path())?;
    let classes = read_stereotype_matrix(&config.stereotypes_path(EntityKind::Class))?;
    let relations = read_stereotype_matrix(&config.stereotypes_path(EntityKind::Relation))?;

    let totals_path = config.totals_path();
    let totals = if totals_path.exists() {
        Some(read_totals(&totals_path)?)
    } else {
        debug!(path = %totals_path.display(), "No totals file; totals are stereotype sums");
        None
    };

    let models = build_models(&records, &classes, &relations, totals.as_ref())?;
    info!(
        models = models.len(),
        class_stereotypes = classes.columns.len(),
        relation_stereotypes = relations.columns.len(),
        "Loaded catalog"
    );
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_count("3.0"), Some(3));
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn test_read_model_records() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "models.csv",
            "model,year,is_classroom\na,2018,False\nb,2020-01-15,True\n",
        );

        let records = read_model_records(&path).unwrap();

        assert_eq!(
            records,
            vec![
                ModelRecord {
                    name: "a".to_string(),
                    year: 2018,
                    is_classroom: false
                },
                ModelRecord {
                    name: "b".to_string(),
                    year: 2020,
                    is_classroom: true
                },
            ]
        );
    }

    #[test]
    fn test_bad_year_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "models.csv", "model,year,is_classroom\na,later,False\n");

        let err = read_model_records(&path).unwrap_err();
        assert!(err.to_string().contains("unreadable year"));
    }

    #[test]
    fn test_none_is_derived_from_totals() {
        let dir = TempDir::new().unwrap();
        let classes = read_stereotype_matrix(&write(&dir, "c.csv", "model,kind,role\na,3,1\nb,5,0\n")).unwrap();
        let relations = read_stereotype_matrix(&write(&dir, "r.csv", "model,material,none,other\na,2,1,0\n")).unwrap();
        let totals: BTreeMap<String, ModelTotals> = [
            (
                "a".to_string(),
                ModelTotals {
                    total_class_number: 6,
                    total_relation_number: 3,
                },
            ),
            (
                "b".to_string(),
                ModelTotals {
                    total_class_number: 4,
                    total_relation_number: 0,
                },
            ),
        ]
        .into();
        let records = vec![
            ModelRecord {
                name: "a".to_string(),
                year: 2015,
                is_classroom: false,
            },
            ModelRecord {
                name: "b".to_string(),
                year: 2016,
                is_classroom: true,
            },
        ];

        let models = build_models(&records, &classes, &relations, Some(&totals)).unwrap();

        let a = models[0].stereotypes(EntityKind::Class);
        assert_eq!(a.get("none"), Some(&2));
        assert_eq!(a.get("other"), Some(&0));
        assert!(models[0].validate().is_ok());

        // b: 5 stereotyped > 4 declared -> clamped, then reported as a mismatch
        assert_eq!(models[1].stereotypes(EntityKind::Class).get("none"), Some(&0));
        assert!(models[1].validate().is_err());
        // b is missing from the relation file
        assert_eq!(models[1].stereotypes(EntityKind::Relation).values().sum::<u64>(), 0);
    }

    #[test]
    fn test_load_models_without_totals() {
        let dir = TempDir::new().unwrap();
        write(&dir, "models_data.csv", "model,year,is_classroom\nm1,2019,1\n");
        write(&dir, "class_stereotypes.csv", "model,kind,none,other\nm1,4,1,0\n");
        write(&dir, "relation_stereotypes.csv", "model,mediation,none,other\nm1,2.0,0,1\n");
        let config = Config {
            catalog_path: dir.path().to_path_buf(),
            ..Config::default()
        };

        let models = load_models(&config).unwrap();

        assert_eq!(models.len(), 1);
        assert_eq!(models[0].total_class_number, 5);
        assert_eq!(models[0].total_relation_number, 3);
        assert!(models[0].is_classroom);
    }

    #[test]
    fn test_missing_file_has_context() {
        let config = Config {
            catalog_path: "/definitely/not/here".into(),
            ..Config::default()
        };

        let err = load_models(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open models file"));
    }
}
