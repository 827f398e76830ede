use clap::Parser;
use log::kv::{ToValue, Value};

/// Every tunable has a built-in default, so the harness runs without any
/// arguments.
#[derive(Parser, Debug, PartialEq)]
#[command(version, about = "Store/query macro-benchmark across persistence backends")]
pub struct CliArgs {
    /// Optional TOML file overriding the built-in benchmark settings.
    #[arg(short, long)]
    pub config: Option<String>,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
