//! Import statistics and report structures
//!
//! Counts are kept per category file and aggregated for the whole run.
//! Diagnostics are stored up to a configured cap; counts never are.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::AddAssign;
use std::path::PathBuf;

use crate::parser::ParseFailure;
use crate::sink::IntegrityReport;

/// Entity and failure counts for one file or a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    /// Synset records handed to the sink
    pub synsets: usize,

    /// Word senses appended
    pub words: usize,

    /// Pointers appended
    pub pointers: usize,

    /// Lines skipped because they could not be decoded
    pub malformed: usize,

    /// Imported records that lost one or more pointer slots
    pub partial_records: usize,

    /// Total pointer slots dropped from partial records
    pub incomplete_pointer_slots: usize,
}

impl ImportCounts {
    /// Data lines looked at, imported or not
    pub fn lines_processed(&self) -> usize {
        self.synsets + self.malformed
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let processed = self.lines_processed();
        if processed == 0 {
            0.0
        } else {
            (self.synsets as f64 / processed as f64) * 100.0
        }
    }
}

impl AddAssign for ImportCounts {
    fn add_assign(&mut self, other: Self) {
        self.synsets += other.synsets;
        self.words += other.words;
        self.pointers += other.pointers;
        self.malformed += other.malformed;
        self.partial_records += other.partial_records;
        self.incomplete_pointer_slots += other.incomplete_pointer_slots;
    }
}

/// What happened to one category file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FileStatus {
    /// Parsed and committed (possibly with zero records)
    Imported,
    /// Not present on disk; skipped
    Missing,
    /// Could not be read; nothing from it reached the sink
    Failed(String),
}

/// Outcome for a single category file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub name: String,
    pub path: PathBuf,
    pub status: FileStatus,
    pub counts: ImportCounts,
    /// Physical lines read, blank lines included
    pub lines_read: usize,
}

impl FileReport {
    pub fn imported(name: &str, path: PathBuf, counts: ImportCounts, lines_read: usize) -> Self {
        Self {
            name: name.to_string(),
            path,
            status: FileStatus::Imported,
            counts,
            lines_read,
        }
    }

    pub fn missing(name: &str, path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            path,
            status: FileStatus::Missing,
            counts: ImportCounts::default(),
            lines_read: 0,
        }
    }

    pub fn failed(name: &str, path: PathBuf, reason: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            status: FileStatus::Failed(reason),
            counts: ImportCounts::default(),
            lines_read: 0,
        }
    }

    pub fn is_imported(&self) -> bool {
        self.status == FileStatus::Imported
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MalformedRecord,
    IncompletePointerSlot,
    IoFailure,
}

/// One non-fatal problem found during the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// Absent for whole-file failures
    pub line_number: Option<usize>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn from_parse_failure(file: PathBuf, failure: &ParseFailure) -> Self {
        let kind = match failure {
            ParseFailure::MalformedRecord { .. } => DiagnosticKind::MalformedRecord,
            ParseFailure::IncompletePointerSlot { .. } => DiagnosticKind::IncompletePointerSlot,
        };
        Self {
            file,
            line_number: Some(failure.line_number()),
            kind,
            message: failure.to_string(),
        }
    }

    /// A record kept with some pointer slots dropped
    pub fn partial_record(file: PathBuf, line_number: usize, dropped: usize) -> Self {
        Self {
            file,
            line_number: Some(line_number),
            kind: DiagnosticKind::IncompletePointerSlot,
            message: format!(
                "{} incomplete pointer slot(s) discarded at line {}",
                dropped, line_number
            ),
        }
    }

    pub fn io_failure(file: PathBuf, reason: String) -> Self {
        Self {
            file,
            line_number: None,
            kind: DiagnosticKind::IoFailure,
            message: reason,
        }
    }
}

/// Result of a complete import run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Per-file outcomes in category order
    pub files: Vec<FileReport>,
    pub totals: ImportCounts,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics not stored because the cap was reached
    pub diagnostics_dropped: usize,
    /// Present when the integrity phase ran
    pub integrity: Option<IntegrityReport>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    #[serde(skip)]
    max_diagnostics: usize,
}

impl ImportReport {
    pub fn new(started_at: DateTime<Utc>, max_diagnostics: usize) -> Self {
        Self {
            files: Vec::new(),
            totals: ImportCounts::default(),
            diagnostics: Vec::new(),
            diagnostics_dropped: 0,
            integrity: None,
            started_at,
            elapsed_ms: 0,
            max_diagnostics,
        }
    }

    /// Store a diagnostic unless the cap has been reached
    pub fn record_diagnostic(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() < self.max_diagnostics {
            self.diagnostics.push(diagnostic);
        } else {
            self.diagnostics_dropped += 1;
        }
    }

    /// Add a file outcome and fold its counts into the totals
    pub fn push_file(&mut self, file: FileReport) {
        self.totals += file.counts;
        self.files.push(file);
    }

    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn files_imported(&self) -> usize {
        self.files.iter().filter(|f| f.is_imported()).count()
    }

    pub fn files_failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed(_)))
            .count()
    }

    pub fn has_malformed(&self) -> bool {
        self.totals.malformed > 0
    }
}
