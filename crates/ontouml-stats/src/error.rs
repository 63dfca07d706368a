use thiserror::Error;

use crate::model::EntityKind;

/// Precondition violations raised by the statistics engine.
///
/// Data-quality issues (empty inputs, zero denominators) never surface here;
/// they degrade to NaN instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Statistics for dataset '{dataset}' have not been calculated")]
    StatisticsNotComputed { dataset: String },

    #[error("Model '{model}' is missing the reserved {kind} stereotype key '{key}'")]
    MissingReservedKey {
        model: String,
        kind: EntityKind,
        key: String,
    },

    #[error(
        "Model '{model}' has {kind} stereotype keys that differ from the rest of dataset '{dataset}'"
    )]
    InconsistentStereotypeKeys {
        dataset: String,
        model: String,
        kind: EntityKind,
    },

    #[error("Model '{model}' declares {expected} {kind} constructs but its stereotype counts sum to {actual}")]
    TotalMismatch {
        model: String,
        kind: EntityKind,
        expected: u64,
        actual: u64,
    },

    #[error("Model '{model}' appears more than once in dataset '{dataset}'")]
    DuplicateModel { dataset: String, model: String },

    #[error("Stereotype table for {kind} has no '{column}' column")]
    MissingColumn { kind: EntityKind, column: String },
}

pub type Result<T> = std::result::Result<T, StatsError>;
