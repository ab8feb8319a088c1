//! Line reading for lexicographer data files.
//!
//! Yields trimmed, non-blank lines with their 1-based physical line
//! numbers. Blank lines are skipped but still advance the counter so
//! diagnostics point at the right place in the file.

use crate::error::{Result, WordnetError};
use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

/// One non-blank line of a data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based physical line number
    pub number: usize,
    /// Line content with surrounding whitespace removed
    pub text: String,
}

/// Re-openable reader over one data file
#[derive(Debug, Clone)]
pub struct LineReader {
    path: PathBuf,
}

impl LineReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and return a fresh lazy sequence of its lines
    ///
    /// Each call reopens the file, so the sequence can be restarted.
    pub fn lines(&self) -> Result<SourceLines> {
        let file = File::open(&self.path).map_err(|e| WordnetError::file_read(&self.path, e))?;
        Ok(SourceLines {
            chunks: BufReader::new(file).split(b'\n'),
            line_number: 0,
            path: self.path.clone(),
        })
    }
}

/// Lazy iterator produced by [`LineReader::lines`]
#[derive(Debug)]
pub struct SourceLines {
    chunks: Split<BufReader<File>>,
    line_number: usize,
    path: PathBuf,
}

impl SourceLines {
    /// Number of physical lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}

impl Iterator for SourceLines {
    type Item = Result<SourceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bytes = match self.chunks.next()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(WordnetError::file_read(&self.path, e))),
            };
            self.line_number += 1;

            // Stray non-UTF-8 bytes are replaced rather than failing the file
            let raw = String::from_utf8_lossy(&bytes);
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            return Some(Ok(SourceLine {
                number: self.line_number,
                text: text.to_string(),
            }));
        }
    }
}
