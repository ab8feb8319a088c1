//! Batch import of WordNet category files into a sink.
//!
//! The importer runs in two phases:
//! 1. Bulk phase: category files are parsed concurrently on blocking worker
//!    tasks, then applied to the sink one file at a time, in the configured
//!    category order, each inside its own batch.
//! 2. Integrity phase: once every file is applied, the sink checks
//!    references across the whole load.
//!
//! Malformed lines are counted and recorded as diagnostics and never stop
//! a file. A missing category file is skipped with zero counts. A file
//! that cannot be read contributes nothing and is reported as failed.

pub mod discovery;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use self::discovery::{
    CategoryFile, category_files, default_dictionary_dir, discover_category_files,
    find_dictionary_dir,
};
pub use self::stats::{
    Diagnostic, DiagnosticKind, FileReport, FileStatus, ImportCounts, ImportReport,
};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ImportConfig;
use crate::error::{Result, WordnetError};
use crate::models::ParsedRecord;
use crate::parser::RecordParser;
use crate::reader::LineReader;
use crate::sink::Sink;

/// How reading a category file ended
#[derive(Debug)]
enum ParseOutcome {
    Parsed,
    Missing,
    Failed(String),
    Cancelled,
}

/// Everything decoded from one category file, not yet applied
#[derive(Debug)]
struct ParsedFile {
    file: CategoryFile,
    outcome: ParseOutcome,
    records: Vec<ParsedRecord>,
    diagnostics: Vec<Diagnostic>,
    diagnostics_dropped: usize,
    malformed: usize,
    lines_read: usize,
}

impl ParsedFile {
    fn empty(file: CategoryFile, outcome: ParseOutcome) -> Self {
        Self {
            file,
            outcome,
            records: Vec::new(),
            diagnostics: Vec::new(),
            diagnostics_dropped: 0,
            malformed: 0,
            lines_read: 0,
        }
    }

    /// Keep at most `max` diagnostics, counting the rest
    fn push_diagnostic(&mut self, diagnostic: Diagnostic, max: usize) {
        if self.diagnostics.len() < max {
            self.diagnostics.push(diagnostic);
        } else {
            self.diagnostics_dropped += 1;
        }
    }
}

/// Drives reading, parsing and sink writes for a set of category files
#[derive(Debug, Clone)]
pub struct BatchImporter {
    config: ImportConfig,
    parser: RecordParser,
    cancellation: CancellationToken,
}

impl BatchImporter {
    pub fn new(config: ImportConfig) -> Result<Self> {
        config.validate()?;
        let parser = RecordParser::new(config.pointer_policy);
        Ok(Self {
            config,
            parser,
            cancellation: CancellationToken::new(),
        })
    }

    /// Use a token owned by the caller (e.g. one tripped by Ctrl-C)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import the configured categories from a dictionary directory
    pub async fn import_dictionary<S: Sink>(
        &self,
        dict_dir: &Path,
        sink: &mut S,
    ) -> Result<ImportReport> {
        if !dict_dir.is_dir() {
            return Err(WordnetError::DictionaryNotFound {
                path: dict_dir.to_path_buf(),
            });
        }
        let files = category_files(dict_dir, &self.config.categories);
        self.import_files(files, sink).await
    }

    /// Import an explicit, ordered list of named data files
    pub async fn import_files<S: Sink>(
        &self,
        files: Vec<CategoryFile>,
        sink: &mut S,
    ) -> Result<ImportReport> {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let mut report = ImportReport::new(started_at, self.config.max_diagnostics);

        info!(
            "Importing {} category file(s) with {} worker(s)",
            files.len(),
            self.config.workers
        );
        sink.seed_master_data()?;

        let parser = self.parser;
        let max_diagnostics = self.config.max_diagnostics;
        let mut parsed_files = stream::iter(files)
            .map(|file| {
                let token = self.cancellation.clone();
                async move {
                    let name = file.name.clone();
                    task::spawn_blocking(move || {
                        parse_category_file(file, parser, &token, max_diagnostics)
                    })
                    .await
                    .map_err(|e| WordnetError::Worker {
                        message: format!("parse task for '{}' failed: {}", name, e),
                    })
                }
            })
            .buffered(self.config.workers);

        while let Some(parsed) = parsed_files.next().await {
            let parsed = parsed?;
            if self.cancellation.is_cancelled() {
                warn!("Import cancelled before applying '{}'", parsed.file.name);
                return Err(WordnetError::Interrupted {
                    files_committed: report.files_imported(),
                });
            }
            self.apply_file(parsed, sink, &mut report)?;
        }

        if self.config.verify_integrity {
            let integrity = sink.verify_integrity()?;
            if integrity.is_clean() {
                info!("Integrity check passed");
            } else {
                warn!(
                    "Integrity check found {} violation(s)",
                    integrity.total_violations()
                );
            }
            report.integrity = Some(integrity);
        }
        sink.finish()?;

        report.elapsed_ms = start_time.elapsed().as_millis();
        info!(
            "Imported {} synsets, {} words, {} pointers ({} malformed lines) in {}ms",
            report.totals.synsets,
            report.totals.words,
            report.totals.pointers,
            report.totals.malformed,
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Write one parsed file to the sink inside its own batch
    fn apply_file<S: Sink>(
        &self,
        parsed: ParsedFile,
        sink: &mut S,
        report: &mut ImportReport,
    ) -> Result<()> {
        let ParsedFile {
            file,
            outcome,
            records,
            diagnostics,
            diagnostics_dropped,
            malformed,
            lines_read,
        } = parsed;

        match outcome {
            ParseOutcome::Parsed => {}
            ParseOutcome::Missing => {
                debug!("Skipping missing category file: {}", file.path.display());
                report.push_file(FileReport::missing(&file.name, file.path));
                return Ok(());
            }
            ParseOutcome::Failed(reason) => {
                warn!("Failed to read {}: {}", file.path.display(), reason);
                report.record_diagnostic(Diagnostic::io_failure(file.path.clone(), reason.clone()));
                report.push_file(FileReport::failed(&file.name, file.path, reason));
                return Ok(());
            }
            ParseOutcome::Cancelled => {
                return Err(WordnetError::Interrupted {
                    files_committed: report.files_imported(),
                });
            }
        }

        info!(
            "Applying {} records from {}",
            records.len(),
            file.path.display()
        );
        for diagnostic in diagnostics {
            report.record_diagnostic(diagnostic);
        }
        report.diagnostics_dropped += diagnostics_dropped;

        let progress = self.progress_bar(records.len() as u64, &file.name);
        let mut counts = ImportCounts {
            malformed,
            ..ImportCounts::default()
        };

        sink.begin_batch(&file.name)?;
        for record in &records {
            if self.cancellation.is_cancelled() {
                sink.rollback_batch()?;
                progress.abandon_with_message(format!("{} cancelled", file.name));
                warn!("Import cancelled; rolled back '{}'", file.name);
                return Err(WordnetError::Interrupted {
                    files_committed: report.files_imported(),
                });
            }
            if let Err(e) = write_record(record, sink) {
                sink.rollback_batch()?;
                return Err(e);
            }

            counts.synsets += 1;
            counts.words += record.words.len();
            counts.pointers += record.pointers.len();
            if record.is_partial() {
                counts.partial_records += 1;
                counts.incomplete_pointer_slots += record.incomplete_pointer_slots;
            }
            progress.inc(1);
        }
        sink.commit_batch()?;
        progress.finish_with_message(format!("{} done", file.name));

        info!(
            "Committed '{}': {} synsets, {} words, {} pointers, {} malformed",
            file.name, counts.synsets, counts.words, counts.pointers, counts.malformed
        );
        report.push_file(FileReport::imported(
            &file.name, file.path, counts, lines_read,
        ));
        Ok(())
    }

    fn progress_bar(&self, len: u64, name: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("Importing {}", name));
        pb
    }
}

fn write_record<S: Sink>(record: &ParsedRecord, sink: &mut S) -> Result<()> {
    sink.upsert_synset(&record.synset)?;
    for word in &record.words {
        sink.append_word_sense(word)?;
    }
    for pointer in &record.pointers {
        sink.append_pointer(pointer)?;
    }
    Ok(())
}

/// Read and decode one category file on a blocking worker
fn parse_category_file(
    file: CategoryFile,
    parser: RecordParser,
    token: &CancellationToken,
    max_diagnostics: usize,
) -> ParsedFile {
    if !file.path.exists() {
        return ParsedFile::empty(file, ParseOutcome::Missing);
    }

    let reader = LineReader::new(&file.path);
    let mut lines = match reader.lines() {
        Ok(lines) => lines,
        Err(e) => {
            let reason = e.to_string();
            return ParsedFile::empty(file, ParseOutcome::Failed(reason));
        }
    };

    debug!("Parsing {}", file.path.display());
    let mut parsed = ParsedFile::empty(file, ParseOutcome::Parsed);

    for line in lines.by_ref() {
        if token.is_cancelled() {
            parsed.outcome = ParseOutcome::Cancelled;
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                // Nothing from a file that fails mid-read reaches the sink
                return ParsedFile::empty(parsed.file, ParseOutcome::Failed(e.to_string()));
            }
        };

        match parser.parse_source_line(&line) {
            Ok(record) => {
                if record.is_partial() {
                    debug!(
                        "{}: line {} dropped {} incomplete pointer slot(s)",
                        parsed.file.path.display(),
                        line.number,
                        record.incomplete_pointer_slots
                    );
                    let diagnostic = Diagnostic::partial_record(
                        parsed.file.path.clone(),
                        line.number,
                        record.incomplete_pointer_slots,
                    );
                    parsed.push_diagnostic(diagnostic, max_diagnostics);
                }
                parsed.records.push(record);
            }
            Err(failure) => {
                warn!("{}: {}", parsed.file.path.display(), failure);
                parsed.malformed += 1;
                let diagnostic = Diagnostic::from_parse_failure(parsed.file.path.clone(), &failure);
                parsed.push_diagnostic(diagnostic, max_diagnostics);
            }
        }
    }

    parsed.lines_read = lines.lines_read();
    debug!(
        "Parsed {}: {} records, {} malformed lines",
        parsed.file.path.display(),
        parsed.records.len(),
        parsed.malformed
    );
    parsed
}
