//! The benchmark engine and the result model it feeds.

mod engine;
mod report;
mod result;

pub use engine::Engine;
pub use report::{Summary, print_report, render_report, summarize};
pub use result::{BenchKey, BenchResult, NS_PER_MS, ResultSet};
