use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::BenchError;

const DATA_SUBDIR: &str = "databench";

/// Where file-backed stores put their artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Explicit directory; resolved from the working or temp dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    /// The explicit `data_dir`, or a `databench/` directory under the
    /// working dir, falling back to the system temp dir.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, BenchError> {
        if let Some(dir) = &self.data_dir {
            return prepare(dir);
        }
        let mut parents = Vec::with_capacity(2);
        if let Ok(cwd) = std::env::current_dir() {
            parents.push(cwd);
        }
        parents.push(std::env::temp_dir());
        first_usable(&parents)
    }
}

/// Creates `dir` and checks that artifacts can be written into it.
fn prepare(dir: &Path) -> Result<PathBuf, BenchError> {
    let fail = |what: &str, e: std::io::Error| {
        BenchError::IoError(format!("{what} {}: {e}", dir.display()))
    };
    std::fs::create_dir_all(dir).map_err(|e| fail("creating", e))?;
    let marker = dir.join(".databench_write_check");
    std::fs::write(&marker, b"").map_err(|e| fail("writing into", e))?;
    std::fs::remove_file(&marker).map_err(|e| fail("cleaning up", e))?;
    Ok(dir.to_path_buf())
}

fn first_usable(parents: &[PathBuf]) -> Result<PathBuf, BenchError> {
    let mut tried = Vec::with_capacity(parents.len());
    for parent in parents {
        match prepare(&parent.join(DATA_SUBDIR)) {
            Ok(dir) => {
                info!("Using data dir: {}", dir.display());
                return Ok(dir);
            }
            Err(e) => {
                warn!("{e}");
                tried.push(e.to_string());
            }
        }
    }
    Err(BenchError::ConfigParsingError(format!(
        "no writable data directory: {}",
        tried.join("; ")
    )))
}
