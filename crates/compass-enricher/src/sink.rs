//! JSON file sink

use crate::OutputConfig;
use compass_domain::traits::RecordSink;
use compass_domain::EnrichedRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors writing a record file
#[derive(Error, Debug)]
pub enum SinkError {
    /// Filesystem failure
    #[error("Failed to write {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The record could not be encoded
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes each record to `{dir}/{prefix}_{index}.json`
///
/// Files are pretty-printed with a 4-space indent and keep non-ASCII text
/// as is. The directory is created on the first write.
pub struct JsonFileSink {
    dir: PathBuf,
    prefix: String,
    dir_ready: bool,
}

impl JsonFileSink {
    /// Create a sink writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            dir_ready: false,
        }
    }

    /// Create a sink from output settings
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.dir(), config.file_prefix.clone())
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the record with `index` is written to
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.json", self.prefix, index))
    }

    fn ensure_dir(&mut self) -> Result<(), SinkError> {
        if !self.dir_ready {
            std::fs::create_dir_all(&self.dir).map_err(|source| SinkError::Io {
                path: self.dir.clone(),
                source,
            })?;
            self.dir_ready = true;
        }
        Ok(())
    }
}

fn encode(record: &EnrichedRecord) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut serializer)?;
    Ok(buffer)
}

impl RecordSink for JsonFileSink {
    type Error = SinkError;

    fn write(&mut self, index: usize, record: &EnrichedRecord) -> Result<PathBuf, Self::Error> {
        self.ensure_dir()?;

        let path = self.path_for(index);
        let bytes = encode(record)?;
        std::fs::write(&path, bytes).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(index, path = %path.display(), "Data was written successfully to the file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_domain::SeedRecord;

    fn record() -> EnrichedRecord {
        let mut seed = SeedRecord::new("u1", "7707083893", Some("ACTIVE".to_string()), "2024-01-01 00:00:00", false);
        seed.dadata_branch_name = Some("Филиал, КПП 773643001\n".to_string());
        EnrichedRecord::from_seed(seed)
    }

    #[test]
    fn test_path_for() {
        let sink = JsonFileSink::new("/data/out", "update");
        assert_eq!(sink.path_for(7), PathBuf::from("/data/out/update_7.json"));
    }

    #[test]
    fn test_encode_indent_and_unicode() {
        let text = String::from_utf8(encode(&record()).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"uuid\": \"u1\""));
        assert!(text.contains("Филиал, КПП 773643001\\n"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_creates_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reference_compass").join("update");
        let mut sink = JsonFileSink::new(&target, "update");

        let first = sink.write(0, &record()).unwrap();
        let second = sink.write(1, &record()).unwrap();

        assert!(first.ends_with("update_0.json"));
        assert!(second.exists());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 2);
    }
}
