//! Core data structures for WordNet lexicographer records.
//!
//! Defines synsets, word senses and pointers as decoded from one data
//! line, plus the category files an import run walks over.

use crate::constants::{CATEGORY_FILE_NAMES, POS_TYPES, SYNSET_LEVEL_SOURCE_TARGET, lex_file_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Part of speech, the closed `{n, v, a, s, r}` symbol set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    AdjectiveSatellite,
    Adverb,
}

impl PartOfSpeech {
    /// Decode a single-character symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "n" => Some(PartOfSpeech::Noun),
            "v" => Some(PartOfSpeech::Verb),
            "a" => Some(PartOfSpeech::Adjective),
            "s" => Some(PartOfSpeech::AdjectiveSatellite),
            "r" => Some(PartOfSpeech::Adverb),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "n",
            PartOfSpeech::Verb => "v",
            PartOfSpeech::Adjective => "a",
            PartOfSpeech::AdjectiveSatellite => "s",
            PartOfSpeech::Adverb => "r",
        }
    }

    /// Human readable name from the master table
    pub fn name(&self) -> &'static str {
        let symbol = self.symbol();
        POS_TYPES
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, name)| *name)
            .unwrap_or(symbol)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Lexical file number as found in the record
///
/// Values outside the 0..=44 table are kept verbatim so the sink can
/// resolve or flag them later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LexFileNumber(pub u32);

impl LexFileNumber {
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Name from the lexical file table, `None` for unknown numbers
    pub fn name(&self) -> Option<&'static str> {
        lex_file_name(self.0)
    }

    pub fn is_known(&self) -> bool {
        self.name().is_some()
    }
}

/// Raw 4-hex-digit source/target token of a pointer
///
/// The first two digits number the word in the source synset, the last two
/// the word in the target synset; `0000` marks a synset-level pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceTarget(String);

impl SourceTarget {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Decode (source word number, target word number) as base 16
    pub fn indices(&self) -> Option<(u8, u8)> {
        if self.0.len() != 4 || !self.0.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let source = u8::from_str_radix(&self.0[..2], 16).ok()?;
        let target = u8::from_str_radix(&self.0[2..], 16).ok()?;
        Some((source, target))
    }

    pub fn is_synset_level(&self) -> bool {
        self.0 == SYNSET_LEVEL_SOURCE_TARGET
    }
}

impl fmt::Display for SourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One group of synonymous word senses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synset {
    /// Offset token, leading zeros preserved
    pub offset: String,
    pub lex_file_number: LexFileNumber,
    pub part_of_speech: PartOfSpeech,
    /// Text after the first `|`, trimmed; empty when absent
    pub gloss: String,
}

/// One lemma occurrence inside a synset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordSense {
    /// Surface form, adjective markers such as `(p)` left in place
    pub lemma: String,
    pub part_of_speech: PartOfSpeech,
    pub synset_offset: String,
    pub lex_id: u32,
}

impl WordSense {
    /// Lemma with underscores shown as spaces (`give_up` -> `give up`)
    pub fn display_lemma(&self) -> String {
        self.lemma.replace('_', " ")
    }
}

/// Directed relation between two synsets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pointer {
    pub source_synset_offset: String,
    pub symbol: String,
    /// May reference a synset that has not been parsed yet
    pub target_synset_offset: String,
    pub source_target: SourceTarget,
}

/// Everything decoded from one data line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub synset: Synset,
    pub words: Vec<WordSense>,
    pub pointers: Vec<Pointer>,
    /// Claimed pointer slots dropped for lack of tokens
    pub incomplete_pointer_slots: usize,
}

impl ParsedRecord {
    pub fn is_partial(&self) -> bool {
        self.incomplete_pointer_slots > 0
    }
}

/// Category data file of a WordNet dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl Category {
    /// All categories in conventional import order
    pub fn all() -> Vec<Category> {
        vec![
            Category::Noun,
            Category::Verb,
            Category::Adjective,
            Category::Adverb,
        ]
    }

    /// File name inside a dictionary directory, e.g. `data.noun`
    pub fn file_name(&self) -> &'static str {
        CATEGORY_FILE_NAMES[self.index()]
    }

    /// Short name as used in file names and on the command line
    pub fn short_name(&self) -> &'static str {
        match self {
            Category::Noun => "noun",
            Category::Verb => "verb",
            Category::Adjective => "adj",
            Category::Adverb => "adv",
        }
    }

    fn index(&self) -> usize {
        match self {
            Category::Noun => 0,
            Category::Verb => 1,
            Category::Adjective => 2,
            Category::Adverb => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "noun" | "n" => Ok(Category::Noun),
            "verb" | "v" => Ok(Category::Verb),
            "adj" | "adjective" | "a" => Ok(Category::Adjective),
            "adv" | "adverb" | "r" => Ok(Category::Adverb),
            other => Err(format!(
                "unknown category '{}' (expected noun, verb, adj or adv)",
                other
            )),
        }
    }
}
