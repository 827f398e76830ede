//! Storage targets the engine can measure.
//!
//! Every backend follows the same lifecycle, driven by a single caller:
//! `setup` once, then any number of `setup_iter` / `store` / `query` /
//! `cleanup_iter` rounds, then `cleanup`. A closed backend may be set up
//! again, which is how the reversed second sweep reuses instances.

pub mod file;
mod memory;
mod mysql;
pub mod sql;
mod sqlite;

use serde::{Deserialize, Serialize};

use crate::conf::Config;
use crate::core::{BenchError, Record};

pub use file::{FileBackend, JsonBackend, YamlBackend};
pub use memory::MemoryBackend;
pub use mysql::{MySqlBackend, MySqlVariant};
pub use sqlite::{SqliteBackend, SqliteVariant};

/// A persistence technology under measurement.
///
/// Only `store` and `query` are timed. Backends may copy or serialize the
/// records they are handed but never keep the borrowed slices.
pub trait Backend {
    /// Human-readable name for benchmark identification.
    fn name(&self) -> &str;

    /// Open or create the backing store and persist `baseline`.
    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError>;

    /// Per-iteration preparation, called right before the timed store.
    fn setup_iter(&mut self) -> Result<(), BenchError> {
        Ok(())
    }

    /// Upsert `batch`: a key stored again overwrites its previous entry.
    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError>;

    /// Look `sample` up by its key. Must be `true` for anything in the
    /// most recent `store`.
    fn query(&mut self, sample: &Record) -> Result<bool, BenchError>;

    fn cleanup_iter(&mut self, _batch: &[Record]) -> Result<(), BenchError> {
        Ok(())
    }

    /// Number of records currently queryable.
    fn count(&mut self) -> Result<usize, BenchError>;

    /// Final teardown: delete files, drop tables, release connections.
    fn cleanup(&mut self) -> Result<(), BenchError>;
}

/// Registered backends, as named in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Memory,
    Json,
    Yaml,
    Sqlite,
    SqliteTransaction,
    SqliteUnsafe,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "mysql_replace")]
    MySqlReplace,
}

impl BackendKind {
    /// Builds the backend, failing early when its configuration is
    /// incomplete (e.g. missing MySQL credentials).
    pub fn build(self, config: &Config) -> Result<Box<dyn Backend>, BenchError> {
        let backend: Box<dyn Backend> = match self {
            BackendKind::Memory => Box::new(MemoryBackend::new()),
            BackendKind::Json => Box::new(JsonBackend::new(config.storage.resolve_data_dir()?)),
            BackendKind::Yaml => Box::new(YamlBackend::new(config.storage.resolve_data_dir()?)),
            BackendKind::Sqlite => Box::new(SqliteBackend::new(
                SqliteVariant::Plain,
                config.storage.resolve_data_dir()?,
            )),
            BackendKind::SqliteTransaction => Box::new(SqliteBackend::new(
                SqliteVariant::Transaction,
                config.storage.resolve_data_dir()?,
            )),
            BackendKind::SqliteUnsafe => Box::new(SqliteBackend::new(
                SqliteVariant::Unsafe,
                config.storage.resolve_data_dir()?,
            )),
            BackendKind::MySql => Box::new(MySqlBackend::new(MySqlVariant::Upsert, &config.mysql)?),
            BackendKind::MySqlReplace => {
                Box::new(MySqlBackend::new(MySqlVariant::Replace, &config.mysql)?)
            }
        };
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::StorageConfig;

    #[test]
    fn test_kind_names() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage: StorageConfig::with_dir(dir.path()),
            ..Config::default()
        };
        let names: Vec<String> = [
            BackendKind::Memory,
            BackendKind::Json,
            BackendKind::Yaml,
            BackendKind::Sqlite,
            BackendKind::SqliteTransaction,
            BackendKind::SqliteUnsafe,
        ]
        .into_iter()
        .map(|kind| kind.build(&config).unwrap().name().to_string())
        .collect();
        assert_eq!(
            names,
            vec![
                "Memory",
                "JSON",
                "YAML",
                "SQLite",
                "SQLite Transaction",
                "SQLite Unsafe"
            ]
        );
    }

    #[test]
    fn test_mysql_without_credentials_fails_to_build() {
        let err = BackendKind::MySqlReplace.build(&Config::default()).err();
        assert_eq!(
            err,
            Some(BenchError::MissingConfig("mysql.user".to_string()))
        );
    }
}
