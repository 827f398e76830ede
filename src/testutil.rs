//! Test utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashSet;
use tempfile::TempDir;

use crate::backend::Backend;
use crate::conf::{BenchConfig, Config, StorageConfig};
use crate::core::{BenchError, Record};
use crate::generator::GeneratorKind;

/// A small, seeded run: no baseline, batches of three, one warmup and two
/// measured iterations.
pub fn tiny_bench_config() -> BenchConfig {
    BenchConfig {
        warmup_iterations: 1,
        measured_iterations: 2,
        baseline_size: 0,
        batch_size: 3,
        seed: Some(42),
        generators: vec![GeneratorKind::Random],
        ..BenchConfig::default()
    }
}

/// A config whose file backends write into a fresh temp dir. Keep the
/// returned `TempDir` alive for as long as the backends are in use.
pub fn temp_config(bench: BenchConfig) -> (TempDir, Config) {
    let dir = TempDir::new().expect("create temp dir");
    let config = Config {
        bench,
        storage: StorageConfig::with_dir(dir.path()),
        ..Config::default()
    };
    (dir, config)
}

/// Lifecycle calls seen by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Setup { backend: String, records: usize },
    SetupIter,
    Store { records: usize },
    Query,
    CleanupIter,
    Cleanup { backend: String },
}

/// Shared call log, so several backends can record into one timeline.
pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// In-memory backend that logs every lifecycle call and can be told to
/// misbehave.
#[derive(Debug)]
pub struct RecordingBackend {
    name: String,
    keys: AHashSet<String>,
    stores: usize,
    log: CallLog,
    /// Fail `setup`.
    pub fail_setup: bool,
    /// Fail the n-th `store` call (1-based) and every one after it.
    pub fail_store_from: Option<usize>,
    /// Report every query as not found.
    pub miss_queries: bool,
    /// Fail the final cleanup.
    pub fail_cleanup: bool,
}

impl RecordingBackend {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            keys: AHashSet::default(),
            stores: 0,
            log,
            fail_setup: false,
            fail_store_from: None,
            miss_queries: false,
            fail_cleanup: false,
        }
    }

    fn push(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError> {
        self.push(Call::Setup {
            backend: self.name.clone(),
            records: baseline.len(),
        });
        if self.fail_setup {
            return Err(BenchError::IoError("simulated setup failure".to_string()));
        }
        self.keys = baseline.iter().map(|r| r.key().to_string()).collect();
        Ok(())
    }

    fn setup_iter(&mut self) -> Result<(), BenchError> {
        self.push(Call::SetupIter);
        Ok(())
    }

    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        self.push(Call::Store {
            records: batch.len(),
        });
        self.stores += 1;
        if self.fail_store_from.is_some_and(|n| self.stores >= n) {
            return Err(BenchError::SqlError("simulated store failure".to_string()));
        }
        self.keys.extend(batch.iter().map(|r| r.key().to_string()));
        Ok(())
    }

    fn query(&mut self, sample: &Record) -> Result<bool, BenchError> {
        self.push(Call::Query);
        Ok(!self.miss_queries && self.keys.contains(sample.key()))
    }

    fn cleanup_iter(&mut self, _batch: &[Record]) -> Result<(), BenchError> {
        self.push(Call::CleanupIter);
        Ok(())
    }

    fn count(&mut self) -> Result<usize, BenchError> {
        Ok(self.keys.len())
    }

    fn cleanup(&mut self) -> Result<(), BenchError> {
        self.push(Call::Cleanup {
            backend: self.name.clone(),
        });
        self.keys.clear();
        if self.fail_cleanup {
            return Err(BenchError::IoError("simulated cleanup failure".to_string()));
        }
        Ok(())
    }
}
