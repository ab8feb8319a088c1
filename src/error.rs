//! Error handling for WordNet import operations.
//!
//! Covers file access, sink persistence and run-level failures. Per-line
//! decode problems are not errors at this level: they are reported as
//! [`ParseFailure`](crate::parser::ParseFailure) values and counted.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read category file: {path} - {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WordNet dictionary not found at path: {path}")]
    DictionaryNotFound { path: PathBuf },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Parse worker failed: {message}")]
    Worker { message: String },

    #[error("Import interrupted after {files_committed} committed file(s)")]
    Interrupted { files_committed: usize },
}

impl WordnetError {
    /// Wrap an I/O failure for a specific file
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WordnetError>;
