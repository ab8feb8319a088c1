//! Record parser for WordNet lexicographer data lines
//!
//! A data line packs a synset header, a hex-counted block of word senses,
//! a decimal-counted block of pointers and an optional gloss:
//!
//! ```text
//! <offset> <lex_filenum> <pos> <w_cnt:hex> (<lemma> <lex_id:hex>)* <p_cnt:dec>
//!     (<symbol> <target_offset> <pos> <source_target:4hex>)* [| <gloss>]
//! ```
//!
//! The parser is a pure function of the line text. Failures come back as
//! [`ParseFailure`] values; nothing is printed.
//!
//! ## Usage
//!
//! ```rust
//! use wordnet_importer::parser::RecordParser;
//!
//! let parser = RecordParser::default();
//! let record = parser
//!     .parse_line(1, "00001740 03 n 01 entity 0 000 | that which is")
//!     .unwrap();
//! assert_eq!(record.synset.gloss, "that which is");
//! assert_eq!(record.words[0].lemma, "entity");
//! ```

pub mod fields;

#[cfg(test)]
mod tests;

use thiserror::Error;
use tracing::trace;

use self::fields::{Tokens, extract_gloss, parse_decimal_field, parse_hex_field};
use crate::config::PointerSlotPolicy;
use crate::constants::GLOSS_DELIMITER;
use crate::models::{
    LexFileNumber, ParsedRecord, PartOfSpeech, Pointer, SourceTarget, Synset, WordSense,
};
use crate::reader::SourceLine;

/// Tokens making up one pointer slot
const POINTER_SLOT_WIDTH: usize = 4;

/// Why a single line could not be turned into a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("malformed record at line {line_number}: {reason}")]
    MalformedRecord { line_number: usize, reason: String },

    #[error(
        "incomplete pointer slot at line {line_number}: {parsed} of {claimed} pointers present"
    )]
    IncompletePointerSlot {
        line_number: usize,
        claimed: usize,
        parsed: usize,
    },
}

impl ParseFailure {
    pub fn line_number(&self) -> usize {
        match self {
            ParseFailure::MalformedRecord { line_number, .. }
            | ParseFailure::IncompletePointerSlot { line_number, .. } => *line_number,
        }
    }

    fn malformed(line_number: usize, reason: String) -> Self {
        ParseFailure::MalformedRecord {
            line_number,
            reason,
        }
    }
}

/// Decoder for single data lines
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser {
    pointer_policy: PointerSlotPolicy,
}

impl RecordParser {
    pub fn new(pointer_policy: PointerSlotPolicy) -> Self {
        Self { pointer_policy }
    }

    pub fn pointer_policy(&self) -> PointerSlotPolicy {
        self.pointer_policy
    }

    /// Parse a line produced by [`LineReader`](crate::reader::LineReader)
    pub fn parse_source_line(&self, line: &SourceLine) -> Result<ParsedRecord, ParseFailure> {
        self.parse_line(line.number, &line.text)
    }

    /// Decode one data line into a synset with its words and pointers
    ///
    /// `line_number` is only used to label failures.
    pub fn parse_line(&self, line_number: usize, text: &str) -> Result<ParsedRecord, ParseFailure> {
        let line = text.trim();
        let record = decode_record(line)
            .map_err(|reason| ParseFailure::malformed(line_number, reason))?;

        if record.incomplete_pointer_slots > 0
            && self.pointer_policy == PointerSlotPolicy::RejectRecord
        {
            let parsed = record.pointers.len();
            return Err(ParseFailure::IncompletePointerSlot {
                line_number,
                claimed: parsed + record.incomplete_pointer_slots,
                parsed,
            });
        }

        Ok(record)
    }
}

/// Positional decode of a trimmed line
fn decode_record(line: &str) -> Result<ParsedRecord, String> {
    let mut tokens = Tokens::new(line);

    let offset = tokens.next_required("synset offset")?;
    if offset.is_empty() {
        return Err("empty synset offset".to_string());
    }
    let lex_file_number = parse_decimal_field(
        tokens.next_required("lex file number")?,
        "lex file number",
    )?;
    let pos_token = tokens.next_required("part of speech")?;
    let part_of_speech = PartOfSpeech::from_symbol(pos_token)
        .ok_or_else(|| format!("unknown part of speech: '{}'", pos_token))?;

    let word_count = parse_hex_field(tokens.next_required("word count")?, "word count")? as usize;
    if word_count.saturating_mul(2) > tokens.remaining() {
        return Err(format!(
            "word block truncated: {} words claimed, {} tokens left",
            word_count,
            tokens.remaining()
        ));
    }

    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        // Lemmas pass through verbatim, even an empty one from a doubled space
        let lemma = tokens.next_required("lemma")?;
        let lex_id = parse_hex_field(tokens.next_required("lex id")?, "lex id")?;
        words.push(WordSense {
            lemma: lemma.to_string(),
            part_of_speech,
            synset_offset: offset.to_string(),
            lex_id,
        });
    }

    let pointer_count =
        parse_decimal_field(tokens.next_required("pointer count")?, "pointer count")? as usize;
    let complete_slots = pointer_count.min(tokens.remaining() / POINTER_SLOT_WIDTH);

    let mut pointers = Vec::with_capacity(complete_slots);
    for _ in 0..complete_slots {
        let symbol = tokens.next_required("pointer symbol")?;
        let target = tokens.next_required("pointer target offset")?;
        let target_pos = tokens.next_required("pointer part of speech")?;
        let source_target = tokens.next_required("pointer source/target")?;
        trace!(
            offset,
            symbol,
            target,
            target_pos,
            source_target,
            "decoded pointer slot"
        );
        pointers.push(Pointer {
            source_synset_offset: offset.to_string(),
            symbol: symbol.to_string(),
            target_synset_offset: target.to_string(),
            source_target: SourceTarget::new(source_target),
        });
    }

    let synset = Synset {
        offset: offset.to_string(),
        lex_file_number: LexFileNumber(lex_file_number),
        part_of_speech,
        gloss: extract_gloss(line, GLOSS_DELIMITER).to_string(),
    };

    Ok(ParsedRecord {
        synset,
        words,
        pointers,
        incomplete_pointer_slots: pointer_count - complete_slots,
    })
}
