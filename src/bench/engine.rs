use std::time::{Duration, Instant};

use log::{Level, debug, error, info, log_enabled};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::Backend;
use crate::bench::result::{BenchKey, BenchResult, NS_PER_MS, ResultSet};
use crate::conf::BenchConfig;
use crate::core::{BenchError, Phase};
use crate::generator::{Generator, RandomGenerator};

/// Wall-clock cost of one store/query round.
#[derive(Debug, Clone, Copy)]
struct IterationTiming {
    store: Duration,
    query: Duration,
}

/// Drives every generator against every backend, then does it again with
/// the backends in reverse so shared state (page cache, buffer pools,
/// thermals) does not always favour the same position.
pub struct Engine {
    config: BenchConfig,
    rng: StdRng,
}

impl Engine {
    pub fn new(config: BenchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs both sweeps. Any setup, store or query failure aborts the whole
    /// run and no partial results are returned.
    pub fn run(
        &mut self,
        generators: &mut [Box<dyn Generator>],
        backends: &mut [Box<dyn Backend>],
    ) -> Result<ResultSet, BenchError> {
        self.config.validate()?;
        info!("N_WARMUP = {}", self.config.warmup_iterations);
        info!("N_ITERATIONS = {}", self.config.measured_iterations);
        info!("N_DATASET = {}", self.config.baseline_size);
        info!("N_ENTRIES = {}", self.config.batch_size);

        let mut results = ResultSet::new();
        self.run_suite(generators, backends, &mut results)?;

        if backends.len() > 1 {
            info!("Reversing backends to reduce skew...");
            backends.reverse();
            let second = self.run_suite(generators, backends, &mut results);
            backends.reverse();
            second?;
        }

        Ok(results)
    }

    fn run_suite(
        &mut self,
        generators: &mut [Box<dyn Generator>],
        backends: &mut [Box<dyn Backend>],
        results: &mut ResultSet,
    ) -> Result<(), BenchError> {
        for generator in generators.iter_mut() {
            for backend in backends.iter_mut() {
                let key = BenchKey::of(&**generator, &**backend);
                let result = results.entry(key);
                let cleaned = self.benchmark(&mut **generator, &mut **backend, result)?;
                if !cleaned {
                    results.record_cleanup_failure();
                }
            }
        }
        Ok(())
    }

    /// Benchmarks one pair. Returns whether the final cleanup succeeded;
    /// a failed cleanup is reported but keeps the collected samples.
    fn benchmark(
        &mut self,
        generator: &mut dyn Generator,
        backend: &mut dyn Backend,
        result: &mut BenchResult,
    ) -> Result<bool, BenchError> {
        let name = backend.name().to_string();
        info!("Starting benchmark...");
        info!("Storage = '{}'", name);
        info!("Data = '{}'", generator.name());

        let baseline = RandomGenerator.generate(self.config.baseline_size, &mut self.rng)?;
        backend
            .setup(&baseline)
            .map_err(|e| e.during(&name, Phase::Setup))?;
        if log_enabled!(Level::Debug) {
            let count = backend.count().map_err(|e| e.during(&name, Phase::Setup))?;
            debug!("{} holds {} records after setup", name, count);
        }

        info!("Starting warmup...");
        for _ in 0..self.config.warmup_iterations {
            self.iterate(generator, backend)?;
        }

        info!("Starting measurement...");
        for i in 0..self.config.measured_iterations {
            let timing = self.iterate(generator, backend)?;
            let store_ns = duration_ns(timing.store);
            let query_ns = duration_ns(timing.query);
            result.add_store_ns(store_ns);
            result.add_query_ns(query_ns);
            info!(
                "Iteration {}: STORE = {:.3} ms, QUERY = {:.3} ms",
                i + 1,
                store_ns as f64 / NS_PER_MS,
                query_ns as f64 / NS_PER_MS
            );
        }

        match backend.cleanup() {
            Ok(()) => Ok(true),
            Err(e) => {
                error!("{}", e.during(&name, Phase::Cleanup));
                Ok(false)
            }
        }
    }

    /// One generate / store / query round. Only the store and query calls
    /// sit inside the timers.
    fn iterate(
        &mut self,
        generator: &mut dyn Generator,
        backend: &mut dyn Backend,
    ) -> Result<IterationTiming, BenchError> {
        let name = backend.name().to_string();
        let batch = generator.generate(self.config.batch_size, &mut self.rng)?;
        if batch.len() != self.config.batch_size {
            return Err(BenchError::BatchSizeMismatch {
                expected: self.config.batch_size,
                actual: batch.len(),
            });
        }

        backend
            .setup_iter()
            .map_err(|e| e.during(&name, Phase::SetupIter))?;

        let start = Instant::now();
        backend
            .store(&batch)
            .map_err(|e| e.during(&name, Phase::Store))?;
        let store = start.elapsed();

        let target = &batch[self.rng.gen_range(0..batch.len())];

        let start = Instant::now();
        let found = backend
            .query(target)
            .map_err(|e| e.during(&name, Phase::Query))?;
        let query = start.elapsed();

        if !found {
            return Err(BenchError::QueryNotFound {
                backend: name,
                key: target.key().to_string(),
            });
        }

        backend
            .cleanup_iter(&batch)
            .map_err(|e| e.during(&name, Phase::CleanupIter))?;

        Ok(IterationTiming { store, query })
    }
}

fn duration_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
