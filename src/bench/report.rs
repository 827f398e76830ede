//! Final per-key summary: mean store and query milliseconds.

use serde::Serialize;

use crate::bench::result::ResultSet;
use crate::conf::BenchConfig;

/// One row of the final table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub key: String,
    /// Samples recorded across both sweep passes.
    pub samples: usize,
    /// Total over `measured_iterations * 2`.
    pub mean_store_ms: f64,
    pub mean_query_ms: f64,
    /// Total over `samples`.
    pub sample_mean_store_ms: f64,
    pub sample_mean_query_ms: f64,
}

pub fn summarize(results: &ResultSet, config: &BenchConfig) -> Vec<Summary> {
    let m = config.measured_iterations;
    results
        .iter()
        .map(|(key, result)| Summary {
            key: key.to_string(),
            samples: result.iterations(),
            mean_store_ms: result.mean_store_ms(m),
            mean_query_ms: result.mean_query_ms(m),
            sample_mean_store_ms: result.sample_mean_store_ms(),
            sample_mean_query_ms: result.sample_mean_query_ms(),
        })
        .collect()
}

pub fn render_report(results: &ResultSet, config: &BenchConfig) -> String {
    let summaries = summarize(results, config);
    let width = summaries
        .iter()
        .map(|s| s.key.len())
        .max()
        .unwrap_or(0)
        .max("Benchmark".len());
    let rule = "=".repeat(width + 40);

    let mut out = format!("{rule}\n  --- Results ---\n");
    out.push_str(&format!(
        "  {:width$} {:>10} {:>12} {:>12}\n",
        "Benchmark", "Samples", "STORE (ms)", "QUERY (ms)"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(width + 37)));
    for s in &summaries {
        out.push_str(&format!(
            "  {:width$} {:>10} {:>12.3} {:>12.3}\n",
            s.key, s.samples, s.mean_store_ms, s.mean_query_ms
        ));
    }
    if results.cleanup_failures() > 0 {
        out.push_str(&format!(
            "\n  {} backend cleanup(s) failed; see log for details.\n",
            results.cleanup_failures()
        ));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

pub fn print_report(results: &ResultSet, config: &BenchConfig) {
    println!("\n{}", render_report(results, config));
}
