//! WordNet Importer Library
//!
//! A Rust library for decoding WordNet lexicographer data files
//! (`data.noun`, `data.verb`, `data.adj`, `data.adv`) and loading them into
//! a persistent store.
//!
//! This library provides tools for:
//! - Decoding data lines with their hex-counted word blocks and
//!   decimal-counted pointer blocks
//! - Skip-and-report handling of malformed lines
//! - Concurrent import of category files with one batch per file
//! - SQLite, Parquet and in-memory sinks with a post-load integrity check
//! - Cooperative cancellation of long imports

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod importer;
pub mod models;
pub mod parser;
pub mod reader;
pub mod sink;

// Re-export commonly used types
pub use config::{ImportConfig, OutputFormat, PointerSlotPolicy};
pub use error::{Result, WordnetError};
pub use importer::{BatchImporter, ImportCounts, ImportReport};
pub use models::{Category, ParsedRecord, PartOfSpeech, Pointer, Synset, WordSense};
pub use parser::{ParseFailure, RecordParser};
pub use reader::LineReader;
pub use sink::{IntegrityReport, MemorySink, ParquetSink, Sink, SqliteSink};
pub use tokio_util::sync::CancellationToken;
