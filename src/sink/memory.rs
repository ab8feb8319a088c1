//! In-memory sink
//!
//! Keeps synsets keyed by offset and words/pointers in arrival order.
//! Writes are staged per batch and only become visible on commit.

use std::collections::BTreeMap;
use tracing::debug;

use super::{IntegrityReport, Sink};
use crate::constants::pointer_name;
use crate::error::{Result, WordnetError};
use crate::models::{Pointer, Synset, WordSense};

#[derive(Debug, Default)]
struct PendingBatch {
    name: String,
    synsets: Vec<Synset>,
    words: Vec<WordSense>,
    pointers: Vec<Pointer>,
}

/// Sink holding committed tables in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    synsets: BTreeMap<String, Synset>,
    words: Vec<WordSense>,
    pointers: Vec<Pointer>,
    pending: Option<PendingBatch>,
    committed_batches: Vec<String>,
    master_data_seeded: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed synsets keyed by offset
    pub fn synsets(&self) -> &BTreeMap<String, Synset> {
        &self.synsets
    }

    pub fn synset(&self, offset: &str) -> Option<&Synset> {
        self.synsets.get(offset)
    }

    pub fn words(&self) -> &[WordSense] {
        &self.words
    }

    pub fn pointers(&self) -> &[Pointer] {
        &self.pointers
    }

    /// Names of committed batches in commit order
    pub fn committed_batches(&self) -> &[String] {
        &self.committed_batches
    }

    pub fn has_open_batch(&self) -> bool {
        self.pending.is_some()
    }

    pub fn master_data_seeded(&self) -> bool {
        self.master_data_seeded
    }

    fn pending_mut(&mut self) -> Result<&mut PendingBatch> {
        self.pending
            .as_mut()
            .ok_or_else(|| WordnetError::sink("write outside of an open batch"))
    }
}

impl Sink for MemorySink {
    fn seed_master_data(&mut self) -> Result<()> {
        self.master_data_seeded = true;
        Ok(())
    }

    fn begin_batch(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.pending {
            return Err(WordnetError::sink(format!(
                "batch '{}' is still open",
                open.name
            )));
        }
        self.pending = Some(PendingBatch {
            name: name.to_string(),
            ..PendingBatch::default()
        });
        Ok(())
    }

    fn upsert_synset(&mut self, synset: &Synset) -> Result<()> {
        self.pending_mut()?.synsets.push(synset.clone());
        Ok(())
    }

    fn append_word_sense(&mut self, word: &WordSense) -> Result<()> {
        self.pending_mut()?.words.push(word.clone());
        Ok(())
    }

    fn append_pointer(&mut self, pointer: &Pointer) -> Result<()> {
        self.pending_mut()?.pointers.push(pointer.clone());
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<()> {
        let batch = self
            .pending
            .take()
            .ok_or_else(|| WordnetError::sink("commit without an open batch"))?;

        debug!(
            "Committing batch '{}': {} synsets, {} words, {} pointers",
            batch.name,
            batch.synsets.len(),
            batch.words.len(),
            batch.pointers.len()
        );

        for synset in batch.synsets {
            self.synsets.insert(synset.offset.clone(), synset);
        }
        self.words.extend(batch.words);
        self.pointers.extend(batch.pointers);
        self.committed_batches.push(batch.name);
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<()> {
        if let Some(batch) = self.pending.take() {
            debug!("Rolled back batch '{}'", batch.name);
        }
        Ok(())
    }

    fn verify_integrity(&mut self) -> Result<IntegrityReport> {
        let orphan_words = self
            .words
            .iter()
            .filter(|word| !self.synsets.contains_key(&word.synset_offset))
            .count();

        let dangling_pointers = self
            .pointers
            .iter()
            .map(|pointer| {
                usize::from(!self.synsets.contains_key(&pointer.source_synset_offset))
                    + usize::from(!self.synsets.contains_key(&pointer.target_synset_offset))
            })
            .sum();

        let unknown_lex_files = self
            .synsets
            .values()
            .filter(|synset| !synset.lex_file_number.is_known())
            .count();

        let unknown_pointer_symbols = self
            .pointers
            .iter()
            .filter(|pointer| pointer_name(&pointer.symbol).is_none())
            .count();

        Ok(IntegrityReport {
            orphan_words,
            dangling_pointers,
            unknown_lex_files,
            unknown_pointer_symbols,
        })
    }
}
