//! The standard dataset family and the outlier plan applied to it.
//!
//! Five cohorts are cut from the full model list:
//!
//! | dataset                              | models                               |
//! |--------------------------------------|--------------------------------------|
//! | `ontouml_all`                        | every model                          |
//! | `ontouml_classroom`                  | classroom models                     |
//! | `ontouml_non_classroom`              | non-classroom models                 |
//! | `ontouml_non_classroom_until_{Y}`    | non-classroom, `year <= Y`           |
//! | `ontouml_non_classroom_after_{Y+1}`  | non-classroom, `year >= Y + 1`       |
//!
//! Outliers are identified on the first three only. Every `non_classroom`
//! dataset is then filtered with the non-classroom outliers, other
//! `classroom` datasets with the classroom outliers and `ontouml_all` with
//! its own.

use tracing::{info, warn};

use super::{Dataset, OutlierRecord};
use crate::error::Result;
use crate::model::Model;

pub const ALL: &str = "ontouml_all";
pub const CLASSROOM: &str = "ontouml_classroom";
pub const NON_CLASSROOM: &str = "ontouml_non_classroom";

/// Build the five standard datasets from the full model list.
pub fn standard_datasets(models: &[Model], split_year: i32) -> Result<Vec<Dataset>> {
    let non_classroom: Vec<Model> = models.iter().filter(|m| !m.is_classroom).cloned().collect();

    let until = non_classroom
        .iter()
        .filter(|m| m.year <= split_year)
        .cloned()
        .collect();
    let after = non_classroom
        .iter()
        .filter(|m| m.year > split_year)
        .cloned()
        .collect();

    let datasets = vec![
        Dataset::new(ALL, models.to_vec())?,
        Dataset::new(
            CLASSROOM,
            models.iter().filter(|m| m.is_classroom).cloned().collect(),
        )?,
        Dataset::new(NON_CLASSROOM, non_classroom)?,
        Dataset::new(format!("{}_until_{}", NON_CLASSROOM, split_year), until)?,
        Dataset::new(format!("{}_after_{}", NON_CLASSROOM, split_year + 1), after)?,
    ];

    for dataset in &datasets {
        info!(dataset = %dataset.name, models = dataset.num_models(), "Cohort created");
    }
    Ok(datasets)
}

/// Which outlier list filters a dataset, chosen by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierSource {
    All,
    Classroom,
    NonClassroom,
}

impl OutlierSource {
    /// `non_classroom` is checked before `classroom` because it contains it.
    pub fn for_dataset(name: &str) -> Option<Self> {
        if name.contains("non_classroom") {
            Some(OutlierSource::NonClassroom)
        } else if name.contains("classroom") {
            Some(OutlierSource::Classroom)
        } else if name == ALL {
            Some(OutlierSource::All)
        } else {
            None
        }
    }

    pub fn dataset_name(&self) -> &'static str {
        match self {
            OutlierSource::All => ALL,
            OutlierSource::Classroom => CLASSROOM,
            OutlierSource::NonClassroom => NON_CLASSROOM,
        }
    }
}

/// Outliers found on the three reference cohorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlierPlan {
    pub all: Vec<OutlierRecord>,
    pub classroom: Vec<OutlierRecord>,
    pub non_classroom: Vec<OutlierRecord>,
}

impl OutlierPlan {
    /// Identify outliers on the reference cohorts present in `datasets`.
    /// A missing reference cohort contributes no outliers.
    pub fn identify(datasets: &[Dataset]) -> Result<Self> {
        let mut plan = OutlierPlan::default();
        for dataset in datasets {
            let slot = match dataset.name.as_str() {
                ALL => &mut plan.all,
                CLASSROOM => &mut plan.classroom,
                NON_CLASSROOM => &mut plan.non_classroom,
                _ => continue,
            };
            *slot = dataset.classify_outliers()?;
        }
        Ok(plan)
    }

    pub fn outliers(&self, source: OutlierSource) -> &[OutlierRecord] {
        match source {
            OutlierSource::All => &self.all,
            OutlierSource::Classroom => &self.classroom,
            OutlierSource::NonClassroom => &self.non_classroom,
        }
    }

    /// Outlier-free forks of every dataset with a matching outlier source.
    pub fn fork_all(&self, datasets: &[Dataset]) -> Vec<Dataset> {
        let mut forks = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            match OutlierSource::for_dataset(&dataset.name) {
                Some(source) => {
                    let names: Vec<&str> = self
                        .outliers(source)
                        .iter()
                        .map(|r| r.model.as_str())
                        .collect();
                    forks.push(dataset.fork_without_outliers(&names));
                }
                None => warn!(dataset = %dataset.name, "No outlier list applies; dataset not filtered"),
            }
        }
        forks
    }

    /// `(reference dataset, record)` pairs for reporting.
    pub fn records(&self) -> Vec<(&'static str, &OutlierRecord)> {
        [
            OutlierSource::All,
            OutlierSource::Classroom,
            OutlierSource::NonClassroom,
        ]
        .into_iter()
        .flat_map(|source| {
            self.outliers(source)
                .iter()
                .map(move |r| (source.dataset_name(), r))
        })
        .collect()
    }
}
