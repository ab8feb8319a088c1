//! SQLite sink
//!
//! Stores synsets, words and pointers in a single database file together
//! with the part-of-speech, lexical file and pointer type master tables.
//! Foreign keys stay off for the bulk phase; `verify_integrity` runs
//! `PRAGMA foreign_key_check` over the finished load and switches them on.

use rusqlite::{Connection, params};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::{IntegrityReport, Sink};
use crate::constants::{LEX_FILE_NAMES, POINTER_TYPES, POS_TYPES};
use crate::error::{Result, WordnetError};
use crate::models::{Pointer, Synset, WordSense};

const UPSERT_SYNSET_SQL: &str = r#"
    INSERT INTO synsets (synset_offset, lex_file_num, pos_code, gloss)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(synset_offset) DO UPDATE SET
        lex_file_num = excluded.lex_file_num,
        pos_code = excluded.pos_code,
        gloss = excluded.gloss
"#;

const INSERT_WORD_SQL: &str =
    "INSERT INTO words (lemma, pos_code, synset_offset, lex_id) VALUES (?1, ?2, ?3, ?4)";

const INSERT_POINTER_SQL: &str = "INSERT INTO pointers (source_synset_offset, pointer_symbol, target_synset_offset, source_target) VALUES (?1, ?2, ?3, ?4)";

/// Row counts of the entity tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub synsets: usize,
    pub words: usize,
    pub pointers: usize,
}

/// SQLite-backed sink, one transaction per batch
pub struct SqliteSink {
    conn: Connection,
    in_batch: bool,
    foreign_keys_enabled: bool,
}

impl SqliteSink {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn,
            in_batch: false,
            foreign_keys_enabled: false,
        })
    }

    /// Create tables, indexes and the word index view
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            -- Bulk phase: references are checked once after the load
            PRAGMA foreign_keys = OFF;

            CREATE TABLE IF NOT EXISTS pos_types (
                pos_code TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lex_file_types (
                file_num INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pointer_types (
                symbol TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS synsets (
                synset_offset TEXT PRIMARY KEY,
                lex_file_num INTEGER NOT NULL,
                pos_code TEXT NOT NULL,
                gloss TEXT,
                FOREIGN KEY (lex_file_num) REFERENCES lex_file_types (file_num),
                FOREIGN KEY (pos_code) REFERENCES pos_types (pos_code)
            );

            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lemma TEXT NOT NULL,
                pos_code TEXT NOT NULL,
                synset_offset TEXT NOT NULL,
                lex_id INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (synset_offset) REFERENCES synsets (synset_offset) ON DELETE CASCADE,
                FOREIGN KEY (pos_code) REFERENCES pos_types (pos_code)
            );

            CREATE TABLE IF NOT EXISTS pointers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_synset_offset TEXT NOT NULL,
                pointer_symbol TEXT NOT NULL,
                target_synset_offset TEXT NOT NULL,
                source_target TEXT,
                FOREIGN KEY (source_synset_offset) REFERENCES synsets (synset_offset) ON DELETE CASCADE,
                FOREIGN KEY (target_synset_offset) REFERENCES synsets (synset_offset) ON DELETE CASCADE,
                FOREIGN KEY (pointer_symbol) REFERENCES pointer_types (symbol)
            );

            CREATE INDEX IF NOT EXISTS idx_words_lemma_pos ON words (lemma, pos_code);
            CREATE INDEX IF NOT EXISTS idx_words_synset ON words (synset_offset);
            CREATE INDEX IF NOT EXISTS idx_synsets_pos ON synsets (pos_code);
            CREATE INDEX IF NOT EXISTS idx_pointers_source ON pointers (source_synset_offset, pointer_symbol);
            CREATE INDEX IF NOT EXISTS idx_pointers_target ON pointers (target_synset_offset);

            CREATE VIEW IF NOT EXISTS word_index AS
            SELECT
                w.lemma,
                w.pos_code,
                COUNT(DISTINCT w.synset_offset) AS synset_cnt,
                COUNT(DISTINCT p.pointer_symbol) AS p_cnt,
                GROUP_CONCAT(DISTINCT p.pointer_symbol) AS ptr_symbol,
                GROUP_CONCAT(DISTINCT w.synset_offset) AS synset_offsets
            FROM words w
            LEFT JOIN pointers p ON w.synset_offset = p.source_synset_offset
            GROUP BY w.lemma, w.pos_code;
            "#,
        )?;
        Ok(())
    }

    /// Underlying connection, for queries over the imported data
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn foreign_keys_enabled(&self) -> bool {
        self.foreign_keys_enabled
    }

    /// Count rows of the entity tables
    pub fn table_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<usize> {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let value: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(value as usize)
        };

        Ok(TableCounts {
            synsets: count("synsets")?,
            words: count("words")?,
            pointers: count("pointers")?,
        })
    }

    fn require_batch(&self) -> Result<()> {
        if self.in_batch {
            Ok(())
        } else {
            Err(WordnetError::sink("write outside of an open batch"))
        }
    }
}

impl Sink for SqliteSink {
    fn seed_master_data(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut pos = tx.prepare(
                "INSERT INTO pos_types (pos_code, name) VALUES (?1, ?2)
                 ON CONFLICT(pos_code) DO UPDATE SET name = excluded.name",
            )?;
            for (code, name) in POS_TYPES {
                pos.execute(params![code, name])?;
            }

            let mut lex = tx.prepare(
                "INSERT INTO lex_file_types (file_num, name) VALUES (?1, ?2)
                 ON CONFLICT(file_num) DO UPDATE SET name = excluded.name",
            )?;
            for (number, name) in LEX_FILE_NAMES.iter().enumerate() {
                lex.execute(params![number as i64, name])?;
            }

            let mut ptr = tx.prepare(
                "INSERT INTO pointer_types (symbol, name) VALUES (?1, ?2)
                 ON CONFLICT(symbol) DO UPDATE SET name = excluded.name",
            )?;
            for (symbol, name) in POINTER_TYPES {
                ptr.execute(params![symbol, name])?;
            }
        }
        tx.commit()?;

        debug!(
            "Seeded master data: {} parts of speech, {} lexical files, {} pointer types",
            POS_TYPES.len(),
            LEX_FILE_NAMES.len(),
            POINTER_TYPES.len()
        );
        Ok(())
    }

    fn begin_batch(&mut self, name: &str) -> Result<()> {
        if self.in_batch {
            return Err(WordnetError::sink(format!(
                "cannot begin batch '{}' while another batch is open",
                name
            )));
        }
        if self.foreign_keys_enabled {
            // The pragma is a no-op inside a transaction, so switch first
            self.conn.execute_batch("PRAGMA foreign_keys = OFF")?;
            self.foreign_keys_enabled = false;
        }
        self.conn.execute_batch("BEGIN")?;
        self.in_batch = true;
        debug!("Began SQLite transaction for batch '{}'", name);
        Ok(())
    }

    fn upsert_synset(&mut self, synset: &Synset) -> Result<()> {
        self.require_batch()?;
        self.conn.prepare_cached(UPSERT_SYNSET_SQL)?.execute(params![
            synset.offset,
            synset.lex_file_number.value(),
            synset.part_of_speech.symbol(),
            synset.gloss,
        ])?;
        Ok(())
    }

    fn append_word_sense(&mut self, word: &WordSense) -> Result<()> {
        self.require_batch()?;
        self.conn.prepare_cached(INSERT_WORD_SQL)?.execute(params![
            word.lemma,
            word.part_of_speech.symbol(),
            word.synset_offset,
            word.lex_id,
        ])?;
        Ok(())
    }

    fn append_pointer(&mut self, pointer: &Pointer) -> Result<()> {
        self.require_batch()?;
        self.conn.prepare_cached(INSERT_POINTER_SQL)?.execute(params![
            pointer.source_synset_offset,
            pointer.symbol,
            pointer.target_synset_offset,
            pointer.source_target.raw(),
        ])?;
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<()> {
        if !self.in_batch {
            return Err(WordnetError::sink("commit without an open batch"));
        }
        self.conn.execute_batch("COMMIT")?;
        self.in_batch = false;
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<()> {
        if self.in_batch {
            self.conn.execute_batch("ROLLBACK")?;
            self.in_batch = false;
        }
        Ok(())
    }

    fn verify_integrity(&mut self) -> Result<IntegrityReport> {
        if self.in_batch {
            return Err(WordnetError::sink(
                "integrity check requested while a batch is open",
            ));
        }

        let mut report = IntegrityReport::default();
        {
            let mut stmt = self.conn.prepare("PRAGMA foreign_key_check")?;
            let violations = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(2)?))
            })?;

            for violation in violations {
                let (table, parent) = violation?;
                match (table.as_str(), parent.as_str()) {
                    ("words", "synsets") => report.orphan_words += 1,
                    ("pointers", "synsets") => report.dangling_pointers += 1,
                    ("synsets", "lex_file_types") => report.unknown_lex_files += 1,
                    ("pointers", "pointer_types") => report.unknown_pointer_symbols += 1,
                    _ => debug!("Unclassified foreign key violation: {} -> {}", table, parent),
                }
            }
        }

        self.conn.execute_batch("PRAGMA foreign_keys = ON")?;
        self.foreign_keys_enabled = true;

        info!(
            "Integrity check: {} violation(s), foreign keys enabled",
            report.total_violations()
        );
        Ok(report)
    }
}
