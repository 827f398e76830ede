use std::fmt;

use crate::backend::Backend;
use crate::generator::Generator;

pub const NS_PER_MS: f64 = 1_000_000.0;

/// Identifies a (generator, backend) pair, e.g. `(Same Key) SQLite`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchKey(String);

impl BenchKey {
    pub fn new(generator: &str, backend: &str) -> Self {
        Self(format!("({generator}) {backend}"))
    }

    pub fn of(generator: &dyn Generator, backend: &dyn Backend) -> Self {
        Self::new(generator.name(), backend.name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BenchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Timings collected for one key across every pass that touched it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchResult {
    store_ns: Vec<u64>,
    query_ns: Vec<u64>,
    total_store_ns: u128,
    total_query_ns: u128,
}

impl BenchResult {
    pub fn add_store_ns(&mut self, nanos: u64) {
        self.store_ns.push(nanos);
        self.total_store_ns += u128::from(nanos);
    }

    pub fn add_query_ns(&mut self, nanos: u64) {
        self.query_ns.push(nanos);
        self.total_query_ns += u128::from(nanos);
    }

    pub fn store_samples(&self) -> &[u64] {
        &self.store_ns
    }

    pub fn query_samples(&self) -> &[u64] {
        &self.query_ns
    }

    /// Number of measured iterations recorded.
    pub fn iterations(&self) -> usize {
        self.store_ns.len().min(self.query_ns.len())
    }

    pub fn total_store_ns(&self) -> u128 {
        self.total_store_ns
    }

    pub fn total_query_ns(&self) -> u128 {
        self.total_query_ns
    }

    pub fn total_store_ms(&self) -> f64 {
        self.total_store_ns as f64 / NS_PER_MS
    }

    pub fn total_query_ms(&self) -> f64 {
        self.total_query_ns as f64 / NS_PER_MS
    }

    /// Reported mean: total over `measured_iterations * 2`, the two sweep
    /// passes' worth of measured rounds.
    pub fn mean_store_ms(&self, measured_iterations: usize) -> f64 {
        per_round(self.total_store_ms(), measured_iterations)
    }

    pub fn mean_query_ms(&self, measured_iterations: usize) -> f64 {
        per_round(self.total_query_ms(), measured_iterations)
    }

    /// Mean over the samples actually recorded.
    pub fn sample_mean_store_ms(&self) -> f64 {
        mean(self.total_store_ms(), self.store_ns.len())
    }

    pub fn sample_mean_query_ms(&self) -> f64 {
        mean(self.total_query_ms(), self.query_ns.len())
    }
}

fn per_round(total: f64, measured_iterations: usize) -> f64 {
    mean(total, measured_iterations * 2)
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

/// Results keyed by [`BenchKey`], in first-seen order. Entries are created
/// on demand and never removed.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<(BenchKey, BenchResult)>,
    cleanup_failures: usize,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, key: BenchKey) -> &mut BenchResult {
        let idx = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key, BenchResult::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, key: &str) -> Option<&BenchResult> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BenchKey, &BenchResult)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn record_cleanup_failure(&mut self) {
        self.cleanup_failures += 1;
    }

    /// Backend cleanups that failed after their measurements completed.
    pub fn cleanup_failures(&self) -> usize {
        self.cleanup_failures
    }
}
