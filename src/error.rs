//! Error types for labelflip
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// labelflip error types
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset path does not resolve to a file
    #[error("Data file not found at {}", .0.display())]
    DataNotFound(PathBuf),

    /// A class has too few members to appear in both sides of a stratified split
    #[error("Insufficient data to stratify: {0}")]
    InsufficientStratificationData(String),

    /// Dataset was readable but its contents are unusable (missing column, null, bad value)
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Caller supplied an out-of-range or inconsistent argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Classifier fitting failed
    #[error("Model error: {0}")]
    Model(String),

    /// Experiment tracking sink rejected an operation
    #[error("Tracking error: {0}")]
    Tracking(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
