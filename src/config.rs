//! Configuration management and validation.
//!
//! Provides the import run configuration, the policy for incomplete
//! pointer slots, and output settings for the persistent sinks.

use crate::constants::{DEFAULT_MAX_DIAGNOSTICS, DEFAULT_MAX_WORKERS};
use crate::error::{Result, WordnetError};
use crate::models::Category;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do when a line claims more pointers than it has tokens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerSlotPolicy {
    /// Drop the incomplete slot, keep the rest of the record, flag it as partial
    #[default]
    DiscardSlot,
    /// Treat the whole line as failed
    RejectRecord,
}

/// Persistent output format of the command-line driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Sqlite,
    Parquet,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "sqlite" | "db" => Ok(OutputFormat::Sqlite),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Sqlite => f.write_str("sqlite"),
            OutputFormat::Parquet => f.write_str("parquet"),
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(format!("unknown compression '{}'", other)),
        }
    }
}

/// Configuration for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Category files to import, in order
    pub categories: Vec<Category>,

    /// Number of category files parsed concurrently
    pub workers: usize,

    /// Handling of incomplete trailing pointer slots
    pub pointer_policy: PointerSlotPolicy,

    /// Run the integrity phase after all files are applied
    pub verify_integrity: bool,

    /// Maximum diagnostics retained in the report
    pub max_diagnostics: usize,

    /// Draw progress bars while applying files
    pub show_progress: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            categories: Category::all(),
            workers: num_cpus::get().clamp(1, DEFAULT_MAX_WORKERS),
            pointer_policy: PointerSlotPolicy::default(),
            verify_integrity: true,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            show_progress: false,
        }
    }
}

impl ImportConfig {
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_pointer_policy(mut self, policy: PointerSlotPolicy) -> Self {
        self.pointer_policy = policy;
        self
    }

    /// Skip the post-load integrity phase
    pub fn without_integrity_check(mut self) -> Self {
        self.verify_integrity = false;
        self
    }

    pub fn with_max_diagnostics(mut self, max_diagnostics: usize) -> Self {
        self.max_diagnostics = max_diagnostics;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Reject configurations the importer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(WordnetError::configuration("workers must be at least 1"));
        }
        if self.categories.is_empty() {
            return Err(WordnetError::configuration(
                "at least one category must be selected",
            ));
        }
        let mut seen = self.categories.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.categories.len() {
            return Err(WordnetError::configuration(
                "categories must not be listed twice",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.categories, Category::all());
        assert!(config.workers >= 1 && config.workers <= DEFAULT_MAX_WORKERS);
        assert_eq!(config.pointer_policy, PointerSlotPolicy::DiscardSlot);
        assert!(config.verify_integrity);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let config = ImportConfig::default().with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(WordnetError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_duplicate_categories() {
        let config =
            ImportConfig::default().with_categories(vec![Category::Noun, Category::Noun]);
        assert!(config.validate().is_err());

        let empty = ImportConfig::default().with_categories(vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("sqlite".parse::<OutputFormat>().unwrap(), OutputFormat::Sqlite);
        assert_eq!("Parquet".parse::<OutputFormat>().unwrap(), OutputFormat::Parquet);
        assert!("csv".parse::<OutputFormat>().is_err());
        assert_eq!(
            "none".parse::<CompressionAlgorithm>().unwrap(),
            CompressionAlgorithm::Uncompressed
        );
    }
}
