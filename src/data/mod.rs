//! Data layer - the canonical dataset and how it is loaded
//!
//! This module contains:
//! - The dataset model (entries, base tables, table identities)
//! - Dataset sources (file-backed and in-memory)

pub mod dataset;
pub mod source;

// Re-export commonly used items
pub use dataset::{Dataset, ElementShape, MappingEntry, TableId};
pub use source::{
    parse_dataset, DatasetFormat, DatasetSource, FileDatasetSource, MemoryDatasetSource,
};
