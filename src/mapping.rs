use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::types::{Error, Result};

/// One original-to-anonymized prefix association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    pub original_prefix: String,
    pub new_prefix: String,
}

/// Append-only tab-separated table of [`MappingRecord`]s, cumulative
/// across runs targeting the same output directory.
///
/// Assumes a single writer: concurrent runs against the same output
/// directory may interleave lines and are unsupported.
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    /// The backing file is not touched until the first append.
    pub fn at(path: &Path) -> Self {
        MappingStore {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Opens and closes the file per call so a failed
    /// run cannot corrupt lines written earlier.
    pub fn append(&self, record: &MappingRecord) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.err(e))?;
        writeln!(f, "{}\t{}", record.original_prefix, record.new_prefix)
            .map_err(|e| self.err(e))?;
        Ok(())
    }

    /// Whether any record in the store already uses `new_prefix`.
    pub fn contains_new_prefix(&self, new_prefix: &str) -> Result<bool> {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.err(e)),
        };
        let reader = BufReader::new(f);
        for line in reader.lines() {
            let line = line.map_err(|e| self.err(e))?;
            if line.split('\t').nth(1) == Some(new_prefix) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn err(&self, source: std::io::Error) -> Error {
        Error::Mapping {
            path: self.path.clone(),
            source,
        }
    }
}
