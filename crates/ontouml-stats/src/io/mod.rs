//! CSV input and output.

pub mod loader;
pub mod writer;

pub use loader::{load_models, ModelRecord, ModelTotals, StereotypeMatrix};
pub use writer::{write_dataset, write_table};
