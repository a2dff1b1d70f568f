use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed filename {filename:?}: expected more than {expected_fields} '{delimiter}'-separated fields")]
    MalformedFilename {
        filename: String,
        delimiter: char,
        expected_fields: usize,
    },

    #[error("failed to copy {path} (group {group}): {source}")]
    CopyFailure {
        group: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("mapping file {path}: {source}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
