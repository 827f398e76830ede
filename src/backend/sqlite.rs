use std::path::{Path, PathBuf};

use log::{debug, warn};
use rusqlite::{Connection, params};

use crate::backend::Backend;
use crate::backend::sql::{self, CommitMode, Statements, UpsertStyle};
use crate::core::{BenchError, Record};

const DB_FILE: &str = "test.db";
const TABLE: &str = "test";

/// The SQLite flavours under comparison. They share schema and statements
/// and differ only in commit strategy and durability pragmas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteVariant {
    /// Every row is its own implicit transaction.
    Plain,
    /// One transaction per store call.
    Transaction,
    /// One transaction per store call with journaling and fsync disabled.
    Unsafe,
}

impl SqliteVariant {
    fn name(self) -> &'static str {
        match self {
            SqliteVariant::Plain => "SQLite",
            SqliteVariant::Transaction => "SQLite Transaction",
            SqliteVariant::Unsafe => "SQLite Unsafe",
        }
    }

    fn commit_mode(self) -> CommitMode {
        match self {
            SqliteVariant::Plain => CommitMode::PerRow,
            SqliteVariant::Transaction | SqliteVariant::Unsafe => CommitMode::Batch,
        }
    }

    fn journal_mode(self) -> Option<&'static str> {
        match self {
            SqliteVariant::Unsafe => Some("OFF"),
            _ => None,
        }
    }

    fn synchronous(self) -> Option<&'static str> {
        match self {
            SqliteVariant::Unsafe => Some("OFF"),
            _ => None,
        }
    }
}

/// SQLite database file in the data directory. Each call opens its own
/// connection, so connection cost is part of every measurement.
#[derive(Debug)]
pub struct SqliteBackend {
    variant: SqliteVariant,
    path: PathBuf,
    statements: Statements,
}

impl SqliteBackend {
    pub fn new(variant: SqliteVariant, data_dir: impl AsRef<Path>) -> Self {
        Self {
            variant,
            path: data_dir.as_ref().join(DB_FILE),
            statements: Statements::new(TABLE, UpsertStyle::Replace),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, BenchError> {
        let conn = Connection::open(&self.path)?;
        if let Some(mode) = self.variant.journal_mode() {
            conn.pragma_update_and_check(None, "journal_mode", mode, |row| {
                row.get::<_, String>(0)
            })?;
        }
        if let Some(sync) = self.variant.synchronous() {
            conn.pragma_update(None, "synchronous", sync)?;
        }
        Ok(conn)
    }

    fn upsert(&self, batch: &[Record], mode: CommitMode) -> Result<(), BenchError> {
        let rows = sql::rows(batch)?;
        let mut conn = self.open()?;
        match mode {
            CommitMode::PerRow => {
                let mut stmt = conn.prepare_cached(&self.statements.upsert)?;
                for row in &rows {
                    stmt.execute(params![
                        row.key,
                        row.int,
                        row.double,
                        f64::from(row.float),
                        row.long
                    ])?;
                }
            }
            CommitMode::Batch => {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare_cached(&self.statements.upsert)?;
                    for row in &rows {
                        stmt.execute(params![
                            row.key,
                            row.int,
                            row.double,
                            f64::from(row.float),
                            row.long
                        ])?;
                    }
                }
                tx.commit()?;
            }
        }
        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn name(&self) -> &str {
        self.variant.name()
    }

    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError> {
        if self.path.exists() {
            warn!("removing stale database {}", self.path.display());
            std::fs::remove_file(&self.path).map_err(|e| {
                BenchError::IoError(format!("removing {}: {}", self.path.display(), e))
            })?;
        }
        self.open()?.execute(&self.statements.create_table, [])?;
        // The baseline load is untimed, so it always uses one transaction.
        self.upsert(baseline, CommitMode::Batch)?;
        debug!(
            "{}: loaded {} baseline rows into {}",
            self.name(),
            baseline.len(),
            self.path.display()
        );
        Ok(())
    }

    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        self.upsert(batch, self.variant.commit_mode())
    }

    fn query(&mut self, sample: &Record) -> Result<bool, BenchError> {
        let key: &str = sample.get(0)?;
        let conn = self.open()?;
        let mut stmt = conn.prepare_cached(&self.statements.select)?;
        Ok(stmt.exists([key])?)
    }

    fn count(&mut self) -> Result<usize, BenchError> {
        let conn = self.open()?;
        let count: i64 = conn.query_row(&self.statements.count, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn cleanup(&mut self) -> Result<(), BenchError> {
        std::fs::remove_file(&self.path).map_err(|e| {
            BenchError::IoError(format!("removing {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> Record {
        Record::new(key.to_string(), 1, 0.5, 0.25, 99)
    }

    #[test]
    fn test_unsafe_variant_disables_journal_and_sync() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::new(SqliteVariant::Unsafe, dir.path());
        let conn = backend.open().unwrap();

        let journal: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        let sync: i64 = conn
            .query_row("PRAGMA synchronous", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal.to_lowercase(), "off");
        assert_eq!(sync, 0);
    }

    #[test]
    fn test_transaction_variant_keeps_default_durability() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::new(SqliteVariant::Transaction, dir.path());
        let conn = backend.open().unwrap();

        let journal: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal.to_lowercase(), "delete");
    }

    #[test]
    fn test_commit_modes() {
        assert_eq!(SqliteVariant::Plain.commit_mode(), CommitMode::PerRow);
        assert_eq!(SqliteVariant::Transaction.commit_mode(), CommitMode::Batch);
        assert_eq!(SqliteVariant::Unsafe.commit_mode(), CommitMode::Batch);
    }

    #[test]
    fn test_setup_replaces_stale_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = SqliteBackend::new(SqliteVariant::Plain, dir.path());
        backend.setup(&[record("old")]).unwrap();

        backend.setup(&[record("new")]).unwrap();
        assert_eq!(backend.count().unwrap(), 1);
        assert!(!backend.query(&record("old")).unwrap());
        assert!(backend.query(&record("new")).unwrap());

        backend.cleanup().unwrap();
        assert!(!backend.path().exists());
    }
}
