use rand::RngCore;

use crate::core::{BenchError, Record};
use crate::generator::{Generator, random_key, random_record};

#[derive(Debug, Default)]
enum KeySet {
    #[default]
    Unfrozen,
    Frozen(Vec<String>),
}

/// Reuses one set of keys for every batch and re-randomizes the other
/// fields, so each store overwrites the same logical entities.
///
/// The first `generate` call draws and freezes `count` keys. Later calls
/// must ask for the same count.
#[derive(Debug, Default)]
pub struct SameKeyGenerator {
    keys: KeySet,
}

impl SameKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&mut self, count: usize, rng: &mut dyn RngCore) -> Result<&[String], BenchError> {
        if let KeySet::Unfrozen = self.keys {
            let keys = (0..count).map(|_| random_key(rng)).collect();
            self.keys = KeySet::Frozen(keys);
        }
        match &self.keys {
            KeySet::Frozen(keys) if keys.len() == count => Ok(keys),
            KeySet::Frozen(keys) => Err(BenchError::BatchSizeMismatch {
                expected: keys.len(),
                actual: count,
            }),
            KeySet::Unfrozen => unreachable!("key set frozen above"),
        }
    }
}

impl Generator for SameKeyGenerator {
    fn name(&self) -> &str {
        "Same Key"
    }

    fn generate(
        &mut self,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Record>, BenchError> {
        let keys = self.keys(count, rng)?;
        Ok(keys
            .iter()
            .map(|key| random_record(key.clone(), rng))
            .collect())
    }
}
