//! Error types for data file I/O

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or writing mission data files.
///
/// Malformed content is never an error: unknown or broken lines are logged
/// and skipped. Only the filesystem can fail.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write data file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
