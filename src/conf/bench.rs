use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::core::BenchError;
use crate::generator::GeneratorKind;

/// Fixed shape of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    #[serde(default = "BenchConfig::default_warmup_iterations")]
    pub warmup_iterations: usize,
    #[serde(default = "BenchConfig::default_measured_iterations")]
    pub measured_iterations: usize,
    /// Records loaded into every backend before timing starts.
    #[serde(default = "BenchConfig::default_baseline_size")]
    pub baseline_size: usize,
    /// Records per store call.
    #[serde(default = "BenchConfig::default_batch_size")]
    pub batch_size: usize,
    /// Seed for generator and query-target randomness. Entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "BenchConfig::default_generators")]
    pub generators: Vec<GeneratorKind>,
    #[serde(default = "BenchConfig::default_backends")]
    pub backends: Vec<BackendKind>,
}

impl BenchConfig {
    fn default_warmup_iterations() -> usize {
        10
    }

    fn default_measured_iterations() -> usize {
        100
    }

    fn default_baseline_size() -> usize {
        5000
    }

    fn default_batch_size() -> usize {
        1000
    }

    fn default_generators() -> Vec<GeneratorKind> {
        vec![GeneratorKind::SameKey]
    }

    fn default_backends() -> Vec<BackendKind> {
        vec![
            BackendKind::Yaml,
            BackendKind::Json,
            BackendKind::SqliteUnsafe,
            BackendKind::SqliteTransaction,
        ]
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        let positive = [
            ("bench.warmup_iterations", self.warmup_iterations),
            ("bench.measured_iterations", self.measured_iterations),
            ("bench.batch_size", self.batch_size),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(BenchError::ConfigParsingError(format!(
                    "{key} must be greater than 0"
                )));
            }
        }
        if self.generators.is_empty() {
            return Err(BenchError::ConfigParsingError(
                "bench.generators must name at least one generator".to_string(),
            ));
        }
        if self.backends.is_empty() {
            return Err(BenchError::ConfigParsingError(
                "bench.backends must name at least one backend".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: Self::default_warmup_iterations(),
            measured_iterations: Self::default_measured_iterations(),
            baseline_size: Self::default_baseline_size(),
            batch_size: Self::default_batch_size(),
            seed: None,
            generators: Self::default_generators(),
            backends: Self::default_backends(),
        }
    }
}
