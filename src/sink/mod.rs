//! Destinations for imported entities
//!
//! The importer feeds every sink through the same narrow interface:
//! - [`memory`] - in-process tables, used for dry runs and tests
//! - [`sqlite`] - relational database with master tables and indexes
//! - [`parquet`] - one Parquet file per entity table
//!
//! A load runs in two phases. During the bulk phase each category file is
//! wrapped in its own batch (`begin_batch` .. `commit_batch`, or
//! `rollback_batch` when the import is cancelled) and no referential checks
//! are enforced, so pointers may name synsets from files not loaded yet.
//! Afterwards `verify_integrity` checks references once over the whole load.

pub mod memory;
pub mod parquet;
pub mod sqlite;

pub use memory::MemorySink;
pub use parquet::ParquetSink;
pub use sqlite::SqliteSink;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Pointer, Synset, WordSense};

/// Outcome of the post-load integrity phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Word senses whose synset offset matches no synset
    pub orphan_words: usize,
    /// Pointer endpoints (source or target) matching no synset
    pub dangling_pointers: usize,
    /// Synsets whose lexical file number is outside the lexical file table
    pub unknown_lex_files: usize,
    /// Pointers whose symbol is not in the pointer type table
    pub unknown_pointer_symbols: usize,
}

impl IntegrityReport {
    pub fn total_violations(&self) -> usize {
        self.orphan_words
            + self.dangling_pointers
            + self.unknown_lex_files
            + self.unknown_pointer_symbols
    }

    pub fn is_clean(&self) -> bool {
        self.total_violations() == 0
    }
}

/// Persistence collaborator fed by the importer
pub trait Sink: Send {
    /// Write the part-of-speech, lexical file and pointer type tables
    fn seed_master_data(&mut self) -> Result<()> {
        Ok(())
    }

    /// Open the batch for one category file
    fn begin_batch(&mut self, name: &str) -> Result<()>;

    /// Insert or overwrite the synset with this offset
    fn upsert_synset(&mut self, synset: &Synset) -> Result<()>;

    /// Append a word sense (never deduplicated)
    fn append_word_sense(&mut self, word: &WordSense) -> Result<()>;

    /// Append a pointer (never deduplicated)
    fn append_pointer(&mut self, pointer: &Pointer) -> Result<()>;

    /// Make the open batch durable
    fn commit_batch(&mut self) -> Result<()>;

    /// Discard everything written since `begin_batch`
    fn rollback_batch(&mut self) -> Result<()>;

    /// Check references across everything committed so far
    fn verify_integrity(&mut self) -> Result<IntegrityReport> {
        Ok(IntegrityReport::default())
    }

    /// Flush any buffered output once the import is over
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
