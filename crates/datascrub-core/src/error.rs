//! Error types for Datascrub

use crate::models::SemanticType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrubError {
    // Table errors
    #[error("Column not found: {column}")]
    ColumnNotFound { column: String },

    #[error("Column already exists: {column}")]
    DuplicateColumn { column: String },

    #[error("Column {column} has {found} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Cannot use {found} value in {expected} column {column}")]
    TypeMismatch {
        column: String,
        expected: SemanticType,
        found: String,
    },

    // Cleaning errors
    #[error("Invalid fill strategy '{token}'. Use mean, median, mode, ffill, or bfill")]
    InvalidStrategy { token: String },

    // Geo errors
    #[error("Invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("Invalid coordinate in column {column}: {reason}")]
    InvalidCoordinate { column: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScrubError {
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound { column: column.into() }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
