//! Tests for single-line record decoding

use super::*;

const ENTITY_LINE: &str = "00001740 03 n 01 entity 0 003 ~ 00001930 n 0000 ~ 00002137 n 0000 ~ 04431553 n 0000 | that which is perceived or known or inferred to have its own distinct existence (living or nonliving)";

const ABLE_LINE: &str = "00001740 00 a 01 able 0 005 = 05207437 n 0000 = 05624029 n 0000 + 05624029 n 0102 ! 00002098 a 0101 + 05207437 n 0101 | (usually followed by `to') having the necessary means or skill or know-how or authority to do something";

const BREATHE_LINE: &str = "00001740 29 v 04 breathe 0 take_a_breath 0 respire 0 suspire 3 021 * 00005041 v 0000 * 00004227 v 0000 + 03110322 a 0301 + 00831191 n 0303 + 04080833 n 0301 + 04250850 n 0105 + 00831191 n 0101 ^ 00004227 v 0103 ^ 00005041 v 0103 $ 00002325 v 0000 $ 00002573 v 0000 ~ 00002573 v 0000 ~ 00002724 v 0000 ~ 00002942 v 0000 ~ 00003826 v 0000 ~ 00004032 v 0000 ~ 00004227 v 0000 ~ 00005041 v 0000 ~ 00006697 v 0000 ~ 00007328 v 0000 ~ 00017031 v 0000 02 + 02 00 + 08 00 | draw air into, and expel out of, the lungs; \"I can breathe better when the air is clean\"";

fn parse(line: &str) -> Result<ParsedRecord, ParseFailure> {
    RecordParser::default().parse_line(7, line)
}

fn expect_malformed(line: &str) -> String {
    match parse(line) {
        Err(ParseFailure::MalformedRecord {
            line_number,
            reason,
        }) => {
            assert_eq!(line_number, 7);
            reason
        }
        other => panic!("Expected MalformedRecord, got {:?}", other),
    }
}

/// Build a line with `words` lemmas and `pointers` hypernym slots
fn synthetic_line(word_count_field: &str, words: usize, ptr_count_field: &str, pointers: usize) -> String {
    let mut line = format!("00012345 05 n {}", word_count_field);
    for i in 0..words {
        line.push_str(&format!(" word{} {:x}", i, i % 16));
    }
    line.push_str(&format!(" {}", ptr_count_field));
    for i in 0..pointers {
        line.push_str(&format!(" @ {:08} n 0000", i));
    }
    line.push_str(" | synthetic");
    line
}

#[test]
fn test_parse_real_noun_line() {
    let record = parse(ENTITY_LINE).unwrap();

    assert_eq!(record.synset.offset, "00001740");
    assert_eq!(record.synset.lex_file_number, LexFileNumber(3));
    assert_eq!(record.synset.lex_file_number.name(), Some("noun.Tops"));
    assert_eq!(record.synset.part_of_speech, PartOfSpeech::Noun);
    assert!(record.synset.gloss.starts_with("that which is perceived"));
    assert!(record.synset.gloss.ends_with("(living or nonliving)"));

    assert_eq!(record.words.len(), 1);
    assert_eq!(record.words[0].lemma, "entity");
    assert_eq!(record.words[0].lex_id, 0);
    assert_eq!(record.words[0].synset_offset, "00001740");
    assert_eq!(record.words[0].part_of_speech, PartOfSpeech::Noun);

    assert_eq!(record.pointers.len(), 3);
    assert_eq!(record.pointers[0].symbol, "~");
    assert_eq!(record.pointers[0].source_synset_offset, "00001740");
    assert_eq!(record.pointers[0].target_synset_offset, "00001930");
    assert!(record.pointers[0].source_target.is_synset_level());
    assert_eq!(record.pointers[2].target_synset_offset, "04431553");
    assert!(!record.is_partial());
}

#[test]
fn test_parse_adjective_lexical_pointers() {
    let record = parse(ABLE_LINE).unwrap();

    assert_eq!(record.synset.part_of_speech, PartOfSpeech::Adjective);
    assert_eq!(record.synset.lex_file_number.name(), Some("adj.all"));
    assert_eq!(record.pointers.len(), 5);

    let antonym = &record.pointers[3];
    assert_eq!(antonym.symbol, "!");
    assert_eq!(antonym.source_target.raw(), "0101");
    assert_eq!(antonym.source_target.indices(), Some((1, 1)));
}

#[test]
fn test_parse_verb_line_ignores_frame_block() {
    let record = parse(BREATHE_LINE).unwrap();

    assert_eq!(record.synset.part_of_speech, PartOfSpeech::Verb);
    assert_eq!(record.words.len(), 4);
    assert_eq!(record.words[1].lemma, "take_a_breath");
    assert_eq!(record.words[3].lemma, "suspire");
    assert_eq!(record.words[3].lex_id, 3);
    assert_eq!(record.pointers.len(), 21);
    assert_eq!(record.pointers[20].target_synset_offset, "00017031");
    assert!(record.synset.gloss.starts_with("draw air into"));
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse(BREATHE_LINE).unwrap();
    let second = parse(BREATHE_LINE).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_word_count_is_hexadecimal() {
    let line = synthetic_line("a", 10, "0", 0);
    let record = parse(&line).unwrap();
    assert_eq!(record.words.len(), 10);
    assert_eq!(record.words[9].lemma, "word9");
}

#[test]
fn test_lex_id_is_hexadecimal() {
    let record = parse("00012345 05 n 02 dog b cat 1f 0").unwrap();
    assert_eq!(record.words[0].lex_id, 11);
    assert_eq!(record.words[1].lex_id, 31);
}

#[test]
fn test_pointer_count_is_decimal() {
    let line = synthetic_line("01", 1, "10", 10);
    let record = parse(&line).unwrap();
    assert_eq!(record.pointers.len(), 10);
    assert_eq!(record.incomplete_pointer_slots, 0);
}

#[test]
fn test_gloss_examples() {
    let record = parse("00001740 03 n 01 entity 0 00 | that which is").unwrap();
    assert_eq!(record.synset.gloss, "that which is");

    let no_gloss = parse("00001740 03 n 01 entity 0 00").unwrap();
    assert_eq!(no_gloss.synset.gloss, "");
}

#[test]
fn test_offset_leading_zeros_preserved() {
    let record = parse("00000001 03 n 01 x 0 0").unwrap();
    assert_eq!(record.synset.offset, "00000001");
    assert_eq!(record.words[0].synset_offset, "00000001");
}

#[test]
fn test_unknown_lex_file_number_is_kept() {
    let record = parse("00001740 77 n 01 entity 0 0").unwrap();
    assert_eq!(record.synset.lex_file_number.value(), 77);
    assert!(!record.synset.lex_file_number.is_known());
}

#[test]
fn test_adjective_marker_passed_through() {
    let record = parse("00012345 00 s 01 galore(ip) 0 0 | in great numbers").unwrap();
    assert_eq!(record.synset.part_of_speech, PartOfSpeech::AdjectiveSatellite);
    assert_eq!(record.words[0].lemma, "galore(ip)");
}

#[test]
fn test_truncated_word_block_is_malformed() {
    let reason = expect_malformed("00012345 05 n 03 dog 0 cat 0");
    assert!(reason.contains("word block truncated"), "{}", reason);
}

#[test]
fn test_invalid_word_count_is_malformed() {
    let reason = expect_malformed("00012345 05 n zz dog 0 0");
    assert!(reason.contains("word count"), "{}", reason);
}

#[test]
fn test_invalid_lex_id_is_malformed() {
    let reason = expect_malformed("00012345 05 n 01 dog g 0");
    assert!(reason.contains("lex id"), "{}", reason);
}

#[test]
fn test_non_decimal_pointer_count_is_malformed() {
    let reason = expect_malformed("00012345 05 n 01 dog 0 0a @ 00000001 n 0000");
    assert!(reason.contains("pointer count"), "{}", reason);
}

#[test]
fn test_missing_pointer_count_is_malformed() {
    let reason = expect_malformed("00012345 05 n 01 dog 0");
    assert!(reason.contains("missing pointer count"), "{}", reason);
}

#[test]
fn test_invalid_header_fields_are_malformed() {
    expect_malformed("00012345 noun n 01 dog 0 0");
    expect_malformed("00012345 05 x 01 dog 0 0");
    expect_malformed("00012345 05");
    // License text at the head of real data files
    expect_malformed("1 This software and database is being provided to you, the LICENSEE, by");
}

#[test]
fn test_incomplete_pointer_slot_discarded_by_default() {
    let line = "00012345 05 n 01 dog 0 002 @ 00000001 n 0000 ~ 00000002";
    let record = parse(line).unwrap();

    assert_eq!(record.words.len(), 1);
    assert_eq!(record.pointers.len(), 1);
    assert_eq!(record.pointers[0].target_synset_offset, "00000001");
    assert_eq!(record.incomplete_pointer_slots, 1);
    assert!(record.is_partial());
}

#[test]
fn test_incomplete_pointer_slot_rejected_by_strict_policy() {
    let parser = RecordParser::new(PointerSlotPolicy::RejectRecord);
    let line = "00012345 05 n 01 dog 0 002 @ 00000001 n 0000 ~ 00000002";

    match parser.parse_line(12, line) {
        Err(ParseFailure::IncompletePointerSlot {
            line_number,
            claimed,
            parsed,
        }) => {
            assert_eq!(line_number, 12);
            assert_eq!(claimed, 2);
            assert_eq!(parsed, 1);
        }
        other => panic!("Expected IncompletePointerSlot, got {:?}", other),
    }

    let complete = "00012345 05 n 01 dog 0 001 @ 00000001 n 0000";
    assert!(parser.parse_line(13, complete).is_ok());
}

#[test]
fn test_huge_pointer_count_does_not_allocate_slots() {
    let record = parse("00012345 05 n 01 dog 0 4000000000").unwrap();
    assert!(record.pointers.is_empty());
    assert_eq!(record.incomplete_pointer_slots, 4_000_000_000);
}

#[test]
fn test_parse_source_line_uses_line_number() {
    let line = SourceLine {
        number: 42,
        text: "broken".to_string(),
    };
    let failure = RecordParser::default().parse_source_line(&line).unwrap_err();
    assert_eq!(failure.line_number(), 42);
    assert!(failure.to_string().contains("line 42"));
}

#[test]
fn test_empty_lemma_token_is_kept_verbatim() {
    let record = parse("00012345 05 n 02 dog 0  1 0 | x").unwrap();
    assert_eq!(record.words.len(), 2);
    assert_eq!(record.words[0].lemma, "dog");
    assert_eq!(record.words[1].lemma, "");
    assert_eq!(record.words[1].lex_id, 1);
    assert!(record.pointers.is_empty());
}
