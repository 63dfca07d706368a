//! Stereotype count partitions and the ratios derived from them.

pub mod class_relation;
pub mod ratios;

pub use class_relation::{ClassRelationMetrics, EntityTotals, StereotypeRow, StereotypeTable};
pub use ratios::{ratio, Ratios};
