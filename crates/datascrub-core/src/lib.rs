//! Datascrub Core - Table model, cleaning operations, and configuration
//!
//! This crate contains the column-aware transformation engine: deduplication,
//! missing-value filling and normalization over an in-memory [`Table`], plus
//! the error taxonomy and the reporting port shared with the other crates.

pub mod cleaning;
pub mod config;
pub mod error;
pub mod models;
pub mod report;

pub use cleaning::{fill_missing, normalize, remove_duplicates};
pub use error::{Result, ScrubError};
pub use models::{Column, ColumnData, SemanticType, Table, Value};
pub use report::Reporter;
