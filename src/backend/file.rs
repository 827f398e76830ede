//! Flat-file backends.
//!
//! A flat file has no incremental update, so every store rewrites the
//! whole cumulative document (baseline plus everything stored since) and
//! every query parses the whole file back.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::core::{BenchError, Record};

/// Non-key fields of a record as they appear in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub int: i32,
    pub double: f64,
    pub float: f32,
    pub long: i64,
}

impl TryFrom<&Record> for Entry {
    type Error = BenchError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        Ok(Entry {
            int: record.get(1)?,
            double: record.get(2)?,
            float: record.get(3)?,
            long: record.get(4)?,
        })
    }
}

/// Record key to entry.
pub type Document = AHashMap<String, Entry>;

/// Serialization format of a file backend.
pub trait DocumentFormat {
    const NAME: &'static str;
    const FILE_NAME: &'static str;

    fn write<W: Write>(doc: &Document, writer: W) -> Result<(), BenchError>;

    fn read<R: Read>(reader: R) -> Result<Document, BenchError>;
}

#[derive(Debug)]
pub struct Json;

impl DocumentFormat for Json {
    const NAME: &'static str = "JSON";
    const FILE_NAME: &'static str = "test.json";

    fn write<W: Write>(doc: &Document, writer: W) -> Result<(), BenchError> {
        Ok(serde_json::to_writer(writer, doc)?)
    }

    fn read<R: Read>(reader: R) -> Result<Document, BenchError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[derive(Debug)]
pub struct Yaml;

impl DocumentFormat for Yaml {
    const NAME: &'static str = "YAML";
    const FILE_NAME: &'static str = "test.yml";

    fn write<W: Write>(doc: &Document, writer: W) -> Result<(), BenchError> {
        Ok(serde_yaml::to_writer(writer, doc)?)
    }

    fn read<R: Read>(reader: R) -> Result<Document, BenchError> {
        Ok(serde_yaml::from_reader(reader)?)
    }
}

pub type JsonBackend = FileBackend<Json>;
pub type YamlBackend = FileBackend<Yaml>;

/// Stores records as one document file in the data directory.
#[derive(Debug)]
pub struct FileBackend<F> {
    path: PathBuf,
    contents: Document,
    _format: PhantomData<F>,
}

impl<F: DocumentFormat> FileBackend<F> {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(F::FILE_NAME),
            contents: Document::default(),
            _format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn merge(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        for record in batch {
            self.contents
                .insert(record.key().to_string(), Entry::try_from(record)?);
        }
        Ok(())
    }

    fn write_file(&self) -> Result<(), BenchError> {
        let file = File::create(&self.path).map_err(|e| {
            BenchError::IoError(format!("creating {}: {}", self.path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        F::write(&self.contents, &mut writer)?;
        writer.flush().map_err(|e| {
            BenchError::IoError(format!("writing {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }

    fn read_file(&self) -> Result<Document, BenchError> {
        let file = File::open(&self.path).map_err(|e| {
            BenchError::IoError(format!("opening {}: {}", self.path.display(), e))
        })?;
        F::read(BufReader::new(file))
    }
}

impl<F: DocumentFormat> Backend for FileBackend<F> {
    fn name(&self) -> &str {
        F::NAME
    }

    fn setup(&mut self, baseline: &[Record]) -> Result<(), BenchError> {
        self.contents.clear();
        self.merge(baseline)?;
        self.write_file()?;
        debug!(
            "wrote {} baseline entries to {}",
            self.contents.len(),
            self.path.display()
        );
        Ok(())
    }

    fn store(&mut self, batch: &[Record]) -> Result<(), BenchError> {
        self.merge(batch)?;
        self.write_file()
    }

    fn query(&mut self, sample: &Record) -> Result<bool, BenchError> {
        let key: &str = sample.get(0)?;
        Ok(self.read_file()?.contains_key(key))
    }

    fn count(&mut self) -> Result<usize, BenchError> {
        Ok(self.read_file()?.len())
    }

    fn cleanup(&mut self) -> Result<(), BenchError> {
        self.contents.clear();
        std::fs::remove_file(&self.path).map_err(|e| {
            BenchError::IoError(format!("removing {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, int: i32) -> Record {
        Record::new(key.to_string(), int, 0.5, 0.25, int as i64 * 10)
    }

    #[test]
    fn test_setup_persists_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonBackend::new(dir.path());
        backend.setup(&[record("a", 1), record("b", 2)]).unwrap();

        assert!(backend.path().exists());
        assert!(backend.query(&record("a", 0)).unwrap());
        assert_eq!(backend.count().unwrap(), 2);
    }

    #[test]
    fn test_store_keeps_cumulative_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = YamlBackend::new(dir.path());
        backend.setup(&[record("base", 1)]).unwrap();
        backend.store(&[record("first", 2)]).unwrap();
        backend.store(&[record("second", 3)]).unwrap();

        for key in ["base", "first", "second"] {
            assert!(backend.query(&record(key, 0)).unwrap(), "missing {key}");
        }
        assert!(!backend.query(&record("never", 0)).unwrap());
    }

    #[test]
    fn test_store_overwrites_repeated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonBackend::new(dir.path());
        backend.setup(&[]).unwrap();
        backend.store(&[record("k", 1)]).unwrap();
        backend.store(&[record("k", 7)]).unwrap();

        let file = File::open(backend.path()).unwrap();
        let doc = Json::read(BufReader::new(file)).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc["k"].int, 7);
        assert_eq!(doc["k"].long, 70);
    }

    #[test]
    fn test_cleanup_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = YamlBackend::new(dir.path());
        backend.setup(&[record("a", 1)]).unwrap();
        backend.cleanup().unwrap();

        assert!(!backend.path().exists());
        assert!(matches!(backend.cleanup(), Err(BenchError::IoError(_))));
    }

    #[test]
    fn test_query_before_setup_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonBackend::new(dir.path());
        assert!(matches!(
            backend.query(&record("a", 1)),
            Err(BenchError::IoError(_))
        ));
    }
}
