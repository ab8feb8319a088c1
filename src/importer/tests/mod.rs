//! Scenario tests for the batch importer
//!
//! Fixture dictionaries are written to temporary directories and imported
//! into in-memory or SQLite sinks.


use std::fs;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::config::ImportConfig;
use crate::error::Result;
use crate::importer::BatchImporter;
use crate::models::{Pointer, Synset, WordSense};
use crate::sink::{IntegrityReport, MemorySink, Sink};

pub const ENTITY_LINE: &str =
    "00001740 03 n 02 entity 0 thing 1 001 ~ 00001930 n 0000 | that which is";
pub const PHYSICAL_ENTITY_LINE: &str =
    "00001930 03 n 01 physical_entity 0 001 @ 00001740 n 0000 | an entity that has physical existence";
pub const BREATHE_LINE: &str = "00001741 29 v 01 breathe 0 000 | draw air into the lungs";
pub const RUN_LINE: &str = "00001742 38 v 01 run 0 001 @ 00001741 v 0000 | move fast";
pub const WALK_LINE: &str = "00001743 38 v 01 walk 0 001 @ 00001742 v 0000 | use your feet";
pub const TRUNCATED_LINE: &str = "00001750 03 n 03 dog 0 cat 0";

/// Write a dictionary directory holding the given data files
pub fn write_dictionary(files: &[(&str, Vec<&str>)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, lines) in files {
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

pub fn test_config() -> ImportConfig {
    ImportConfig::default().with_workers(2)
}

pub fn importer() -> BatchImporter {
    BatchImporter::new(test_config()).unwrap()
}

/// Memory sink that trips a token after a given number of synset upserts
pub struct CancellingSink {
    pub inner: MemorySink,
    token: CancellationToken,
    cancel_after: usize,
    upserts: usize,
}

impl CancellingSink {
    pub fn new(token: CancellationToken, cancel_after: usize) -> Self {
        Self {
            inner: MemorySink::new(),
            token,
            cancel_after,
            upserts: 0,
        }
    }
}

impl Sink for CancellingSink {
    fn begin_batch(&mut self, name: &str) -> Result<()> {
        self.inner.begin_batch(name)
    }

    fn upsert_synset(&mut self, synset: &Synset) -> Result<()> {
        self.upserts += 1;
        if self.upserts == self.cancel_after {
            self.token.cancel();
        }
        self.inner.upsert_synset(synset)
    }

    fn append_word_sense(&mut self, word: &WordSense) -> Result<()> {
        self.inner.append_word_sense(word)
    }

    fn append_pointer(&mut self, pointer: &Pointer) -> Result<()> {
        self.inner.append_pointer(pointer)
    }

    fn commit_batch(&mut self) -> Result<()> {
        self.inner.commit_batch()
    }

    fn rollback_batch(&mut self) -> Result<()> {
        self.inner.rollback_batch()
    }

    fn verify_integrity(&mut self) -> Result<IntegrityReport> {
        self.inner.verify_integrity()
    }
}
