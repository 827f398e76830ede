use rand::RngCore;

use crate::core::{BenchError, Record};
use crate::generator::{Generator, random_key, random_record};

/// Every field of every record, key included, is new on each call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomGenerator;

impl Generator for RandomGenerator {
    fn name(&self) -> &str {
        "Random Data"
    }

    fn generate(
        &mut self,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Record>, BenchError> {
        Ok((0..count)
            .map(|_| {
                let key = random_key(rng);
                random_record(key, rng)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::core::{FieldType, SCHEMA, Value};

    #[test]
    fn test_generates_exact_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let batch = RandomGenerator.generate(17, &mut rng).unwrap();
        assert_eq!(batch.len(), 17);
        assert!(RandomGenerator.generate(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_keys_differ_between_calls() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut generator = RandomGenerator;
        let first = generator.generate(100, &mut rng).unwrap();
        let second = generator.generate(100, &mut rng).unwrap();

        let keys: HashSet<&str> = first.iter().chain(&second).map(Record::key).collect();
        assert_eq!(keys.len(), 200);
    }

    #[test]
    fn test_fields_match_schema() {
        let mut rng = StdRng::seed_from_u64(3);
        for record in RandomGenerator.generate(50, &mut rng).unwrap() {
            let types: Vec<FieldType> = record.values().iter().map(Value::field_type).collect();
            assert_eq!(types, SCHEMA.to_vec());
            let double: f64 = record.get(2).unwrap();
            let float: f32 = record.get(3).unwrap();
            assert!((0.0..1.0).contains(&double));
            assert!((0.0..1.0).contains(&float));
        }
    }
}
