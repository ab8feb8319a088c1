//! Command-line interface for the WordNet importer.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{CompressionAlgorithm, ImportConfig, OutputFormat, PointerSlotPolicy};
use crate::importer::{
    BatchImporter, FileReport, FileStatus, ImportReport, default_dictionary_dir,
    discover_category_files, find_dictionary_dir,
};
use crate::models::Category;
use crate::sink::{MemorySink, ParquetSink, SqliteSink};

/// Diagnostics shown in the summary before eliding the rest
const DIAGNOSTIC_SAMPLE_SIZE: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "wordnet-importer")]
#[command(about = "Import WordNet lexicographer data files into SQLite or Parquet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// WordNet dictionary directory holding data.noun, data.verb, ... (searched
    /// under the user data directory if not provided)
    #[arg(value_name = "DICT_DIR")]
    pub dict_dir: Option<PathBuf>,

    /// Output database file (sqlite) or directory (parquet)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (sqlite, parquet)
    #[arg(long, default_value = "sqlite")]
    pub format: OutputFormat,

    /// Categories to import, comma separated (noun, verb, adj, adv)
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<Category>>,

    /// Number of files parsed concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Skip records whose pointer block is short instead of dropping the missing slots
    #[arg(long)]
    pub strict_pointers: bool,

    /// Parse and count without writing any output
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the post-load integrity check
    #[arg(long)]
    pub no_verify: bool,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    /// Exit with an error if any line was malformed
    #[arg(long)]
    pub fail_on_malformed: bool,

    /// Show per-file progress bars
    #[arg(long)]
    pub progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the importer configuration from the flags
    pub fn import_config(&self) -> ImportConfig {
        let mut config = ImportConfig::default();
        if let Some(categories) = &self.categories {
            config = config.with_categories(categories.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.strict_pointers {
            config = config.with_pointer_policy(PointerSlotPolicy::RejectRecord);
        }
        if self.no_verify {
            config = config.without_integrity_check();
        }
        if self.progress {
            config = config.with_progress();
        }
        config
    }

    /// Get the output path, defaulting to `wordnet.db` or `wordnet_parquet/`
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => match self.format {
                OutputFormat::Sqlite => PathBuf::from("wordnet.db"),
                OutputFormat::Parquet => PathBuf::from("wordnet_parquet"),
            },
        }
    }

    /// Locate the dictionary directory to import from
    ///
    /// A given path is used as is when it holds data files, otherwise it is
    /// searched. Without a path the user data directory is searched.
    pub fn resolve_dictionary_dir(&self) -> Result<PathBuf> {
        let root = match &self.dict_dir {
            Some(path) => path.clone(),
            None => default_dictionary_dir().context("Could not determine user data directory")?,
        };

        if !root.exists() {
            anyhow::bail!(
                "WordNet dictionary directory not found at {}. Pass the path to the WordNet 'dict' directory.",
                root.display()
            );
        }
        if root.is_dir() && !discover_category_files(&root)?.is_empty() {
            return Ok(root);
        }

        find_dictionary_dir(&root)
            .with_context(|| format!("No WordNet data files found under {}", root.display()))
    }
}

/// Run an import as described by `args`
pub async fn run(args: Args, token: CancellationToken) -> Result<ImportReport> {
    let dict_dir = args.resolve_dictionary_dir()?;
    let output_path = args.output_path();
    let config = args.import_config();
    debug!("Import configuration: {:?}", config);

    println!("{}", "WordNet import".bright_green().bold());
    println!("  {} {}", "Dictionary:".bright_cyan(), dict_dir.display());
    if args.dry_run {
        println!("  {} {}", "Output:".bright_cyan(), "none (dry run)".bright_black());
    } else {
        println!(
            "  {} {} ({})",
            "Output:".bright_cyan(),
            output_path.display(),
            args.format
        );
    }

    let present = discover_category_files(&dict_dir)?;
    println!(
        "  {} {}",
        "Found:".bright_cyan(),
        present
            .iter()
            .map(|c| c.file_name())
            .collect::<Vec<_>>()
            .join(", ")
            .bright_white()
    );
    println!();

    let importer = BatchImporter::new(config)?.with_cancellation(token);

    let report = if args.dry_run {
        let mut sink = MemorySink::new();
        importer.import_dictionary(&dict_dir, &mut sink).await?
    } else {
        match args.format {
            OutputFormat::Sqlite => {
                let mut sink = SqliteSink::open(&output_path).with_context(|| {
                    format!("Failed to open database {}", output_path.display())
                })?;
                let report = importer.import_dictionary(&dict_dir, &mut sink).await?;
                let counts = sink.table_counts()?;
                println!("{}", "Database statistics".bright_green().bold());
                println!("  {} {}", "Synsets:".bright_cyan(), counts.synsets);
                println!("  {} {}", "Words:".bright_cyan(), counts.words);
                println!("  {} {}", "Pointers:".bright_cyan(), counts.pointers);
                println!();
                report
            }
            OutputFormat::Parquet => {
                let mut sink = ParquetSink::new(&output_path).with_compression(args.compression);
                importer.import_dictionary(&dict_dir, &mut sink).await?
            }
        }
    };

    print_summary(&report, &output_path, args.dry_run);

    if args.fail_on_malformed && report.has_malformed() {
        anyhow::bail!(
            "{} malformed line(s) found and --fail-on-malformed is set",
            report.totals.malformed
        );
    }
    Ok(report)
}

/// Print per-file counts, a sample of diagnostics and the integrity result
pub fn print_summary(report: &ImportReport, output_path: &Path, dry_run: bool) {
    println!("{}", "Import Summary".bright_green().bold());
    for file in &report.files {
        print_file_line(file);
    }

    let totals = &report.totals;
    println!(
        "  {} {} synsets, {} words, {} pointers",
        "Total:".bright_cyan(),
        totals.synsets.to_string().bright_white().bold(),
        totals.words.to_string().bright_white().bold(),
        totals.pointers.to_string().bright_white().bold()
    );
    if totals.malformed > 0 {
        println!(
            "  {} {}",
            "Malformed lines:".bright_red(),
            totals.malformed.to_string().bright_red().bold()
        );
    }
    if totals.partial_records > 0 {
        println!(
            "  {} {} ({} pointer slot(s) dropped)",
            "Partial records:".bright_yellow(),
            totals.partial_records,
            totals.incomplete_pointer_slots
        );
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        report.elapsed_ms.to_string().bright_white()
    );

    if !report.diagnostics.is_empty() {
        println!("\n{}", "Diagnostics".bright_yellow());
        for diagnostic in report.diagnostics.iter().take(DIAGNOSTIC_SAMPLE_SIZE) {
            println!("  {} {}", diagnostic.file.display().to_string().bright_black(), diagnostic.message);
        }
        let hidden = report.diagnostics.len().saturating_sub(DIAGNOSTIC_SAMPLE_SIZE)
            + report.diagnostics_dropped;
        if hidden > 0 {
            println!("  {}", format!("... and {} more", hidden).bright_black());
        }
    }

    if let Some(integrity) = &report.integrity {
        println!();
        if integrity.is_clean() {
            println!("{}", "Integrity check passed".bright_green());
        } else {
            println!(
                "{} {} violation(s)",
                "Integrity check:".bright_red(),
                integrity.total_violations().to_string().bright_red().bold()
            );
            println!("  {} {}", "Orphan words:".bright_cyan(), integrity.orphan_words);
            println!(
                "  {} {}",
                "Dangling pointer ends:".bright_cyan(),
                integrity.dangling_pointers
            );
            println!(
                "  {} {}",
                "Unknown lexical files:".bright_cyan(),
                integrity.unknown_lex_files
            );
            println!(
                "  {} {}",
                "Unknown pointer symbols:".bright_cyan(),
                integrity.unknown_pointer_symbols
            );
        }
    }

    if !dry_run {
        println!(
            "\n{} {}",
            "Output written to".bright_green(),
            output_path.display()
        );
    }
}

fn print_file_line(file: &FileReport) {
    let name = format!("{:<5}", file.name);
    match &file.status {
        FileStatus::Imported => println!(
            "  {} {} synsets, {} words, {} pointers, {} malformed",
            name.bright_cyan(),
            file.counts.synsets,
            file.counts.words,
            file.counts.pointers,
            file.counts.malformed
        ),
        FileStatus::Missing => println!("  {} {}", name.bright_cyan(), "not present".bright_black()),
        FileStatus::Failed(reason) => {
            println!("  {} {} {}", name.bright_cyan(), "failed:".bright_red(), reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_args_map_to_config() {
        let args = Args::parse_from([
            "wordnet-importer",
            "/tmp/dict",
            "--categories",
            "verb,adj",
            "--workers",
            "3",
            "--strict-pointers",
            "--no-verify",
        ]);
        let config = args.import_config();

        assert_eq!(config.categories, vec![Category::Verb, Category::Adjective]);
        assert_eq!(config.workers, 3);
        assert_eq!(config.pointer_policy, PointerSlotPolicy::RejectRecord);
        assert!(!config.verify_integrity);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_default_output_paths() {
        let sqlite = Args::parse_from(["wordnet-importer"]);
        assert_eq!(sqlite.output_path(), PathBuf::from("wordnet.db"));

        let parquet = Args::parse_from(["wordnet-importer", "--format", "parquet"]);
        assert_eq!(parquet.output_path(), PathBuf::from("wordnet_parquet"));

        let explicit = Args::parse_from(["wordnet-importer", "-o", "out/wn.sqlite"]);
        assert_eq!(explicit.output_path(), PathBuf::from("out/wn.sqlite"));
    }

    #[test]
    fn test_invalid_category_rejected() {
        let result = Args::try_parse_from(["wordnet-importer", "--categories", "noun,pronoun"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_dictionary_dir_searches_nested() {
        let temp_dir = TempDir::new().unwrap();
        let dict = temp_dir.path().join("WordNet-3.0").join("dict");
        fs::create_dir_all(&dict).unwrap();
        fs::write(dict.join("data.noun"), "").unwrap();

        let direct = Args::parse_from(["wordnet-importer", dict.to_str().unwrap()]);
        assert_eq!(direct.resolve_dictionary_dir().unwrap(), dict);

        let nested = Args::parse_from(["wordnet-importer", temp_dir.path().to_str().unwrap()]);
        assert_eq!(nested.resolve_dictionary_dir().unwrap(), dict);
    }

    #[test]
    fn test_resolve_dictionary_dir_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let args = Args::parse_from(["wordnet-importer", missing.to_str().unwrap()]);
        assert!(args.resolve_dictionary_dir().is_err());
    }
}
