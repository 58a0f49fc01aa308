//! Error types for the Arete evaluation system
//!
//! This module provides structured error definitions using thiserror,
//! with anyhow reserved for propagation at the binary boundary.

use thiserror::Error;

/// Main error type for Arete operations
#[derive(Error, Debug)]
pub enum AreteError {
    /// Input rejected before any write (bad level, missing selection)
    #[error("Validation error: {0}")]
    Validation(String),

    /// An evaluation already exists for this worker and period
    #[error("Evaluation already exists for worker {worker_id} in {month}/{year}")]
    DuplicateEvaluation {
        worker_id: i64,
        month: u32,
        year: i32,
    },

    /// Worker or evaluation not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Migration failed
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Arete operations
pub type Result<T> = std::result::Result<T, AreteError>;

impl From<libsql::Error> for AreteError {
    fn from(err: libsql::Error) -> Self {
        AreteError::Database(err.to_string())
    }
}

/// Convert anyhow::Error to AreteError
impl From<anyhow::Error> for AreteError {
    fn from(err: anyhow::Error) -> Self {
        AreteError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AreteError::NotFound("worker 42".to_string());
        assert_eq!(err.to_string(), "Not found: worker 42");
    }

    #[test]
    fn test_duplicate_display_names_period() {
        let err = AreteError::DuplicateEvaluation {
            worker_id: 7,
            month: 3,
            year: 2025,
        };
        assert!(err.to_string().contains("worker 7"));
        assert!(err.to_string().contains("3/2025"));
    }
}
