mod bench;
mod config;
mod mysql;
mod storage;

pub use bench::BenchConfig;
pub use config::Config;
pub use mysql::MySqlConfig;
pub use storage::StorageConfig;
