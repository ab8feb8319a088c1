//! Parquet sink
//!
//! Collects committed entities in memory and writes `synsets.parquet`,
//! `words.parquet` and `pointers.parquet` into an output directory when
//! the import finishes.

use polars::prelude::{Column, DataFrame, ParquetWriter as PolarsParquetWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{IntegrityReport, MemorySink, Sink};
use crate::config::CompressionAlgorithm;
use crate::error::{Result, WordnetError};
use crate::models::{Pointer, Synset, WordSense};

pub const SYNSETS_FILE: &str = "synsets.parquet";
pub const WORDS_FILE: &str = "words.parquet";
pub const POINTERS_FILE: &str = "pointers.parquet";

/// Sink writing one Parquet file per entity table
#[derive(Debug)]
pub struct ParquetSink {
    output_dir: PathBuf,
    compression: CompressionAlgorithm,
    tables: MemorySink,
    written: bool,
}

impl ParquetSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            compression: CompressionAlgorithm::default(),
            tables: MemorySink::new(),
            written: false,
        }
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths of the three output files
    pub fn output_files(&self) -> [PathBuf; 3] {
        [
            self.output_dir.join(SYNSETS_FILE),
            self.output_dir.join(WORDS_FILE),
            self.output_dir.join(POINTERS_FILE),
        ]
    }

    fn synsets_frame(&self) -> Result<DataFrame> {
        let synsets = self.tables.synsets();
        let offsets: Vec<&str> = synsets.values().map(|s| s.offset.as_str()).collect();
        let lex_file_nums: Vec<i64> = synsets
            .values()
            .map(|s| i64::from(s.lex_file_number.value()))
            .collect();
        let pos_codes: Vec<&str> = synsets.values().map(|s| s.part_of_speech.symbol()).collect();
        let glosses: Vec<&str> = synsets.values().map(|s| s.gloss.as_str()).collect();

        Ok(DataFrame::new(vec![
            Column::new("synset_offset".into(), offsets),
            Column::new("lex_file_num".into(), lex_file_nums),
            Column::new("pos_code".into(), pos_codes),
            Column::new("gloss".into(), glosses),
        ])?)
    }

    fn words_frame(&self) -> Result<DataFrame> {
        let words = self.tables.words();
        let lemmas: Vec<&str> = words.iter().map(|w| w.lemma.as_str()).collect();
        let pos_codes: Vec<&str> = words.iter().map(|w| w.part_of_speech.symbol()).collect();
        let offsets: Vec<&str> = words.iter().map(|w| w.synset_offset.as_str()).collect();
        let lex_ids: Vec<i64> = words.iter().map(|w| i64::from(w.lex_id)).collect();

        Ok(DataFrame::new(vec![
            Column::new("lemma".into(), lemmas),
            Column::new("pos_code".into(), pos_codes),
            Column::new("synset_offset".into(), offsets),
            Column::new("lex_id".into(), lex_ids),
        ])?)
    }

    fn pointers_frame(&self) -> Result<DataFrame> {
        let pointers = self.tables.pointers();
        let sources: Vec<&str> = pointers
            .iter()
            .map(|p| p.source_synset_offset.as_str())
            .collect();
        let symbols: Vec<&str> = pointers.iter().map(|p| p.symbol.as_str()).collect();
        let targets: Vec<&str> = pointers
            .iter()
            .map(|p| p.target_synset_offset.as_str())
            .collect();
        let source_targets: Vec<&str> = pointers.iter().map(|p| p.source_target.raw()).collect();

        Ok(DataFrame::new(vec![
            Column::new("source_synset_offset".into(), sources),
            Column::new("pointer_symbol".into(), symbols),
            Column::new("target_synset_offset".into(), targets),
            Column::new("source_target".into(), source_targets),
        ])?)
    }

    fn write_frame(&self, mut df: DataFrame, file_name: &str) -> Result<()> {
        let path = self.output_dir.join(file_name);
        let file = File::create(&path).map_err(|e| WordnetError::file_read(&path, e))?;

        PolarsParquetWriter::new(file)
            .with_compression(self.compression.to_polars_compression())
            .finish(&mut df)?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}

impl Sink for ParquetSink {
    fn begin_batch(&mut self, name: &str) -> Result<()> {
        self.tables.begin_batch(name)
    }

    fn upsert_synset(&mut self, synset: &Synset) -> Result<()> {
        self.tables.upsert_synset(synset)
    }

    fn append_word_sense(&mut self, word: &WordSense) -> Result<()> {
        self.tables.append_word_sense(word)
    }

    fn append_pointer(&mut self, pointer: &Pointer) -> Result<()> {
        self.tables.append_pointer(pointer)
    }

    fn commit_batch(&mut self) -> Result<()> {
        self.tables.commit_batch()
    }

    fn rollback_batch(&mut self) -> Result<()> {
        self.tables.rollback_batch()
    }

    fn verify_integrity(&mut self) -> Result<IntegrityReport> {
        self.tables.verify_integrity()
    }

    fn finish(&mut self) -> Result<()> {
        if self.written {
            return Ok(());
        }
        std::fs::create_dir_all(&self.output_dir)?;

        self.write_frame(self.synsets_frame()?, SYNSETS_FILE)?;
        self.write_frame(self.words_frame()?, WORDS_FILE)?;
        self.write_frame(self.pointers_frame()?, POINTERS_FILE)?;
        self.written = true;

        info!(
            "Wrote Parquet tables to {} ({} synsets, {} words, {} pointers)",
            self.output_dir.display(),
            self.tables.synsets().len(),
            self.tables.words().len(),
            self.tables.pointers().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LexFileNumber, PartOfSpeech, SourceTarget};
    use polars::prelude::{ParquetReader, SerReader};
    use tempfile::TempDir;

    fn read_back(path: &Path) -> DataFrame {
        let file = File::open(path).unwrap();
        ParquetReader::new(file).finish().unwrap()
    }

    #[test]
    fn test_finish_writes_three_tables() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = ParquetSink::new(temp_dir.path().join("parquet"))
            .with_compression(CompressionAlgorithm::Zstd);

        sink.begin_batch("noun").unwrap();
        sink.upsert_synset(&Synset {
            offset: "00001740".to_string(),
            lex_file_number: LexFileNumber(3),
            part_of_speech: PartOfSpeech::Noun,
            gloss: "that which is".to_string(),
        })
        .unwrap();
        sink.append_word_sense(&WordSense {
            lemma: "entity".to_string(),
            part_of_speech: PartOfSpeech::Noun,
            synset_offset: "00001740".to_string(),
            lex_id: 0,
        })
        .unwrap();
        sink.append_pointer(&Pointer {
            source_synset_offset: "00001740".to_string(),
            symbol: "~".to_string(),
            target_synset_offset: "00001930".to_string(),
            source_target: SourceTarget::new("0000"),
        })
        .unwrap();
        sink.commit_batch().unwrap();
        sink.finish().unwrap();

        let [synsets, words, pointers] = sink.output_files();
        assert_eq!(read_back(&synsets).height(), 1);
        assert_eq!(read_back(&words).height(), 1);

        let pointer_df = read_back(&pointers);
        assert_eq!(pointer_df.height(), 1);
        assert_eq!(pointer_df.width(), 4);
    }

    #[test]
    fn test_finish_with_no_rows_writes_empty_tables() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = ParquetSink::new(temp_dir.path());
        sink.finish().unwrap();

        for path in sink.output_files() {
            assert!(path.exists());
            assert_eq!(read_back(&path).height(), 0);
        }
    }

    #[test]
    fn test_rolled_back_rows_not_written() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = ParquetSink::new(temp_dir.path());
        sink.begin_batch("noun").unwrap();
        sink.append_word_sense(&WordSense {
            lemma: "entity".to_string(),
            part_of_speech: PartOfSpeech::Noun,
            synset_offset: "00001740".to_string(),
            lex_id: 0,
        })
        .unwrap();
        sink.rollback_batch().unwrap();
        sink.finish().unwrap();

        assert_eq!(read_back(&sink.output_dir().join(WORDS_FILE)).height(), 0);
    }
}
