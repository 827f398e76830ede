use log::debug;

use crate::backend::Backend;
use crate::backend::file::{Document, Entry};
use crate::core::{BenchError, Record};

/// Keeps everything in a process-local hash map. Serves as the floor the
/// persistent backends are compared against.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Document,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        "Memory"
    }

    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError> {
        self.entries.clear();
        self.store(baseline)
    }

    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        for record in batch {
            self.entries
                .insert(record.key().to_string(), Entry::try_from(record)?);
        }
        Ok(())
    }

    fn query(&mut self, sample: &Record) -> Result<bool, BenchError> {
        let key: &str = sample.get(0)?;
        Ok(self.entries.contains_key(key))
    }

    fn count(&mut self) -> Result<usize, BenchError> {
        Ok(self.entries.len())
    }

    fn cleanup(&mut self) -> Result<(), BenchError> {
        debug!("dropping {} in-memory entries", self.entries.len());
        self.entries.clear();
        Ok(())
    }
}
