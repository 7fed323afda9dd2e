//! Error handling for the analytics library.

use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Specialized error type for analytics operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required column was missing from a record batch
    #[error("Column not found: {column}")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },
    /// A column had an unexpected Arrow data type
    #[error("Invalid data type for column '{column}': expected {expected}")]
    InvalidDataType {
        /// Name of the offending column
        column: String,
        /// Human-readable name of the expected type
        expected: String,
    },
    /// Error reading or interpreting a configuration file
    #[error("Invalid configuration at {path}: {message}")]
    Config {
        /// Path of the configuration file
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },
}

/// Result type for analytics operations
pub type Result<T> = anyhow::Result<T>;
