use serde::{Deserialize, Serialize};

use crate::core::BenchError;

/// Connection settings for the MySQL backends. Credentials normally come
/// from `DATABENCH_MYSQL__USER` / `DATABENCH_MYSQL__PASS`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MySqlConfig {
    #[serde(default = "MySqlConfig::default_host")]
    pub host: String,
    #[serde(default = "MySqlConfig::default_port")]
    pub port: u16,
    #[serde(default = "MySqlConfig::default_database")]
    pub database: String,
    #[serde(default = "MySqlConfig::default_table")]
    pub table: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
}

impl MySqlConfig {
    fn default_host() -> String {
        String::from("localhost")
    }

    fn default_port() -> u16 {
        3306
    }

    fn default_database() -> String {
        String::from("test")
    }

    fn default_table() -> String {
        String::from("test")
    }

    pub fn credentials(&self) -> Result<(&str, &str), BenchError> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| BenchError::MissingConfig("mysql.user".to_string()))?;
        let pass = self
            .pass
            .as_deref()
            .ok_or_else(|| BenchError::MissingConfig("mysql.pass".to_string()))?;
        Ok((user, pass))
    }
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            database: Self::default_database(),
            table: Self::default_table(),
            user: None,
            pass: None,
        }
    }
}
