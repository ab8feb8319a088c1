//! Closed enumerations of the WordNet lexicographer format.
//!
//! These tables are master data: the parser validates part-of-speech
//! symbols against [`POS_TYPES`] but never reinterprets lexical file
//! numbers or pointer symbols. Sinks seed them as lookup tables.

// =============================================================================
// Category Files
// =============================================================================

/// Prefix shared by all lexicographer data files
pub const DATA_FILE_PREFIX: &str = "data.";

/// Conventional category file names, in import order
pub const CATEGORY_FILE_NAMES: [&str; 4] = ["data.noun", "data.verb", "data.adj", "data.adv"];

/// Pattern recognising a category data file name
pub const CATEGORY_FILE_PATTERN: &str = r"^data\.(noun|verb|adj|adv)$";

/// Dictionary directory below the platform data dir when no path is given
pub const DEFAULT_DICTIONARY_SUBDIR: &str = "wordnet/dict";

// =============================================================================
// Import Defaults
// =============================================================================

/// Upper bound on the default parse worker count
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Number of diagnostics kept in a report (counts are never capped)
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 10_000;

/// Raw source/target token of a pointer between whole synsets
pub const SYNSET_LEVEL_SOURCE_TARGET: &str = "0000";

/// Delimiter separating the structured fields from the gloss
pub const GLOSS_DELIMITER: char = '|';

// =============================================================================
// Part of Speech
// =============================================================================

/// (symbol, name) for each part of speech
pub const POS_TYPES: [(&str, &str); 5] = [
    ("n", "Noun"),
    ("v", "Verb"),
    ("a", "Adjective"),
    ("s", "Adjective Satellite"),
    ("r", "Adverb"),
];

// =============================================================================
// Lexical Files
// =============================================================================

/// Lexical file names indexed by lexical file number (0..=44)
pub const LEX_FILE_NAMES: [&str; 45] = [
    "adj.all",
    "adj.pert",
    "adv.all",
    "noun.Tops",
    "noun.act",
    "noun.animal",
    "noun.artifact",
    "noun.attribute",
    "noun.body",
    "noun.cognition",
    "noun.communication",
    "noun.event",
    "noun.feeling",
    "noun.food",
    "noun.group",
    "noun.location",
    "noun.motive",
    "noun.object",
    "noun.person",
    "noun.phenomenon",
    "noun.plant",
    "noun.possession",
    "noun.process",
    "noun.quantity",
    "noun.relation",
    "noun.shape",
    "noun.state",
    "noun.substance",
    "noun.time",
    "verb.body",
    "verb.change",
    "verb.cognition",
    "verb.communication",
    "verb.competition",
    "verb.consumption",
    "verb.contact",
    "verb.creation",
    "verb.emotion",
    "verb.motion",
    "verb.perception",
    "verb.possession",
    "verb.social",
    "verb.stative",
    "verb.weather",
    "adj.ppl",
];

/// Resolve a lexical file number to its name
pub fn lex_file_name(number: u32) -> Option<&'static str> {
    LEX_FILE_NAMES.get(number as usize).copied()
}

// =============================================================================
// Pointer Symbols
// =============================================================================

/// (symbol, name) for each relation type
pub const POINTER_TYPES: [(&str, &str); 26] = [
    ("@", "Hypernym"),
    ("@i", "Instance Hypernym"),
    ("~", "Hyponym"),
    ("~i", "Instance Hyponym"),
    ("#m", "Member holonym"),
    ("#s", "Substance holonym"),
    ("#p", "Part holonym"),
    ("%m", "Member meronym"),
    ("%s", "Substance meronym"),
    ("%p", "Part meronym"),
    ("=", "Attribute"),
    ("+", "Derivationally related form"),
    ("!", "Antonym"),
    ("&", "Similar to"),
    ("<", "Participle of verb"),
    ("*", "Entailment"),
    (">", "Cause"),
    ("^", "Also see"),
    ("$", "Verb Group"),
    (";c", "Domain of synset - TOPIC"),
    (";r", "Domain of synset - REGION"),
    (";u", "Domain of synset - USAGE"),
    ("-c", "Member of this domain - TOPIC"),
    ("-r", "Member of this domain - REGION"),
    ("-u", "Member of this domain - USAGE"),
    ("\\", "Derived from adjective"),
];

/// Resolve a pointer symbol to its relation name
pub fn pointer_name(symbol: &str) -> Option<&'static str> {
    POINTER_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == symbol)
        .map(|(_, name)| *name)
}
