//! Analytics error types.

use std::path::PathBuf;
use thiserror::Error;
use ugv_domain::DomainError;

/// Analytics errors.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// DuckDB error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Row failed domain validation
    #[error("Invalid mission record: {0}")]
    Domain(#[from] DomainError),

    /// Data conversion error
    #[error("Data conversion error: {0}")]
    Conversion(String),

    /// Dataset file missing
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
