use std::fmt;

use thiserror::Error;

use crate::core::FieldType;

/// Lifecycle step of a backend, attached to failures so the report says
/// where a run broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    SetupIter,
    Store,
    Query,
    CleanupIter,
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::SetupIter => "setup_iter",
            Phase::Store => "store",
            Phase::Query => "query",
            Phase::CleanupIter => "cleanup_iter",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BenchError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Missing required config key: {0}")]
    MissingConfig(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Codec error: {0}")]
    CodecError(String),
    #[error("SQL error: {0}")]
    SqlError(String),
    #[error("Field index {index} out of range for record of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Field {index} holds {actual}, requested {expected}")]
    TypeMismatch {
        index: usize,
        expected: FieldType,
        actual: FieldType,
    },
    #[error("Generator produced {actual} records, expected {expected}")]
    BatchSizeMismatch { expected: usize, actual: usize },
    #[error("Backend '{backend}' did not find freshly stored key '{key}'")]
    QueryNotFound { backend: String, key: String },
    #[error("Backend '{backend}' failed during {phase}: {message}")]
    Backend {
        backend: String,
        phase: Phase,
        message: String,
    },
}

impl BenchError {
    /// Tags an error with the backend and lifecycle phase it came from.
    /// Query misses and already-tagged errors pass through unchanged.
    pub fn during(self, backend: &str, phase: Phase) -> BenchError {
        match self {
            err @ (BenchError::QueryNotFound { .. } | BenchError::Backend { .. }) => err,
            other => BenchError::Backend {
                backend: backend.to_string(),
                phase,
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::CodecError(err.to_string())
    }
}

impl From<serde_yaml::Error> for BenchError {
    fn from(err: serde_yaml::Error) -> Self {
        BenchError::CodecError(err.to_string())
    }
}

impl From<rusqlite::Error> for BenchError {
    fn from(err: rusqlite::Error) -> Self {
        BenchError::SqlError(err.to_string())
    }
}

impl From<mysql_async::Error> for BenchError {
    fn from(err: mysql_async::Error) -> Self {
        BenchError::SqlError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_during_wraps_plain_errors() {
        let err = BenchError::IoError("disk full".to_string()).during("JSON", Phase::Store);
        assert_eq!(
            err,
            BenchError::Backend {
                backend: "JSON".to_string(),
                phase: Phase::Store,
                message: "IO error: disk full".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Backend 'JSON' failed during store: IO error: disk full"
        );
    }

    #[test]
    fn test_during_keeps_query_miss_distinct() {
        let miss = BenchError::QueryNotFound {
            backend: "YAML".to_string(),
            key: "abc".to_string(),
        };
        assert_eq!(miss.clone().during("YAML", Phase::Query), miss);
    }
}
