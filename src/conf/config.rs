use std::collections::HashMap;

use crate::{
    conf::{BenchConfig, MySqlConfig, StorageConfig},
    core::BenchError::{self, ConfigParsingError},
};
use config::{Config as CConfig, Environment};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "DATABENCH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub bench: BenchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mysql: MySqlConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, BenchError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.bench.validate()?;
        Ok(config)
    }

    /// Loads built-in defaults, then the optional TOML file, then
    /// `DATABENCH_*` environment variables (`__` separates nested keys,
    /// e.g. `DATABENCH_MYSQL__USER`).
    pub fn load(path: Option<&str>) -> Result<Config, BenchError> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(
        path: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Config, BenchError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::new(path, config::FileFormat::Toml));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.bench.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::generator::GeneratorKind;

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [bench]
        warmup_iterations = 2
        measured_iterations = 5
        baseline_size = 0
        batch_size = 10
        seed = 7
        generators = ["random", "same_key"]
        backends = ["memory", "json"]

        [mysql]
        user = "bench"
        pass = "secret"
        "#;
        let conf = Config::from_str(toml).unwrap();
        assert_eq!(
            conf.bench,
            BenchConfig {
                warmup_iterations: 2,
                measured_iterations: 5,
                baseline_size: 0,
                batch_size: 10,
                seed: Some(7),
                generators: vec![GeneratorKind::Random, GeneratorKind::SameKey],
                backends: vec![BackendKind::Memory, BackendKind::Json],
            }
        );
        assert_eq!(conf.mysql.credentials(), Ok(("bench", "secret")));
        assert_eq!(conf.storage, StorageConfig::default());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let conf = Config::from_str("").unwrap();
        assert_eq!(conf, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let conf = Config::from_str("[bench]\nwarmup = 3\n");
        assert!(matches!(conf, Err(ConfigParsingError(_))));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let conf = Config::from_str("[bench]\nmeasured_iterations = 0\n");
        assert!(matches!(conf, Err(ConfigParsingError(_))));
    }

    #[test]
    fn env_overrides_credentials_and_counts() {
        let env = HashMap::from([
            ("DATABENCH_MYSQL__USER".to_string(), "root".to_string()),
            ("DATABENCH_MYSQL__PASS".to_string(), "1234".to_string()),
            (
                "DATABENCH_BENCH__WARMUP_ITERATIONS".to_string(),
                "3".to_string(),
            ),
        ]);
        let conf = Config::load_with_env(None, Some(env)).unwrap();
        assert_eq!(conf.mysql.credentials(), Ok(("root", "1234")));
        assert_eq!(conf.bench.warmup_iterations, 3);
        assert_eq!(
            conf.bench.measured_iterations,
            BenchConfig::default().measured_iterations
        );
    }
}
