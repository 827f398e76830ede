mod args;
mod error;
mod logger;
mod record;

pub use args::CliArgs;
pub use error::{BenchError, Phase};
pub use logger::setup_logging;
pub use record::{FIELD_COUNT, FieldType, FieldValue, Record, SCHEMA, Value};
