use clap::Parser;
use log::{debug, info};

use databench::bench::{Engine, print_report, summarize};
use databench::conf::Config;
use databench::core::{CliArgs, setup_logging};

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "Starting DataBenchmark test suite...");

    let config = Config::load(args.config.as_deref())?;

    let mut generators: Vec<_> = config
        .bench
        .generators
        .iter()
        .map(|kind| kind.build())
        .collect();
    let mut backends = config
        .bench
        .backends
        .iter()
        .map(|kind| kind.build(&config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut engine = Engine::new(config.bench.clone());
    let results = engine.run(&mut generators, &mut backends)?;

    debug!("summary: {}", serde_json::to_string(&summarize(&results, &config.bench))?);
    print_report(&results, &config.bench);
    Ok(())
}
