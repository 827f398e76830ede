//! Synthetic record generators.
//!
//! A generator hands the engine a fresh batch on every iteration. The
//! random source is passed in by the caller so generators carry no hidden
//! global state.

mod random;
mod same_data;
mod same_key;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Builder;

use crate::core::{BenchError, Record};

pub use random::RandomGenerator;
pub use same_data::SameDataGenerator;
pub use same_key::SameKeyGenerator;

/// A source of record batches.
///
/// Implementations must return exactly `count` records per call and are
/// only ever driven by one caller at a time.
pub trait Generator {
    /// Stable name used in benchmark keys.
    fn name(&self) -> &str;

    fn generate(&mut self, count: usize, rng: &mut dyn RngCore)
        -> Result<Vec<Record>, BenchError>;
}

/// Registered generator strategies, as named in the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Random,
    SameKey,
    SameData,
}

impl GeneratorKind {
    pub fn build(self) -> Box<dyn Generator> {
        match self {
            GeneratorKind::Random => Box::new(RandomGenerator),
            GeneratorKind::SameKey => Box::new(SameKeyGenerator::new()),
            GeneratorKind::SameData => Box::new(SameDataGenerator::new()),
        }
    }
}

/// Random v4 UUID drawn from `rng`, 36 chars: fits the `VARCHAR(36)` key column.
pub(crate) fn random_key(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// A record for `key` with every non-key field freshly drawn.
pub(crate) fn random_record(key: String, rng: &mut dyn RngCore) -> Record {
    Record::new(
        key,
        rng.r#gen::<i32>(),
        rng.r#gen::<f64>(),
        rng.r#gen::<f32>(),
        rng.r#gen::<i64>(),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_random_key_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let key = random_key(&mut rng);
        assert_eq!(key.len(), 36);
        let groups: Vec<usize> = key.split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert_eq!(&key[14..15], "4");
        let parsed = uuid::Uuid::parse_str(&key).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(GeneratorKind::Random.build().name(), "Random Data");
        assert_eq!(GeneratorKind::SameKey.build().name(), "Same Key");
        assert_eq!(GeneratorKind::SameData.build().name(), "Same Data");
    }
}
