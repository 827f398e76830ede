use rand::RngCore;

use crate::core::{BenchError, Record};
use crate::generator::{Generator, RandomGenerator};

/// Returns byte-identical records on every call. The first call draws the
/// batch; later calls must ask for the same count.
#[derive(Debug, Default)]
pub struct SameDataGenerator {
    frozen: Option<Vec<Record>>,
}

impl SameDataGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for SameDataGenerator {
    fn name(&self) -> &str {
        "Same Data"
    }

    fn generate(
        &mut self,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Record>, BenchError> {
        let batch = match self.frozen.take() {
            Some(batch) => batch,
            None => RandomGenerator.generate(count, rng)?,
        };
        let result = if batch.len() == count {
            Ok(batch.clone())
        } else {
            Err(BenchError::BatchSizeMismatch {
                expected: batch.len(),
                actual: count,
            })
        };
        self.frozen = Some(batch);
        result
    }
}
