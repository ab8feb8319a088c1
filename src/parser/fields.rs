//! Field decoding helpers for data lines
//!
//! Every numeric field has exactly one base. The helpers are named by base
//! so call sites state it explicitly instead of relying on context.

/// Bounds-checked cursor over the space-separated tokens of a line
#[derive(Debug)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> Tokens<'a> {
    /// Split on single spaces, keeping empty tokens produced by doubled spaces
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split(' ').collect(),
            position: 0,
        }
    }

    /// Take the next token, or report which field was missing
    pub fn next_required(&mut self, field_name: &str) -> Result<&'a str, String> {
        let token = self.tokens.get(self.position).copied().ok_or_else(|| {
            format!(
                "missing {} (token {} of {})",
                field_name,
                self.position,
                self.tokens.len()
            )
        })?;
        self.position += 1;
        Ok(token)
    }

    /// Tokens not yet consumed
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Decode a base-16 field (word count, lex id)
pub fn parse_hex_field(token: &str, field_name: &str) -> Result<u32, String> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!(
            "invalid hexadecimal {}: '{}'",
            field_name, token
        ));
    }
    u32::from_str_radix(token, 16)
        .map_err(|e| format!("invalid hexadecimal {}: '{}' ({})", field_name, token, e))
}

/// Decode a base-10 field (lex file number, pointer count)
pub fn parse_decimal_field(token: &str, field_name: &str) -> Result<u32, String> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid decimal {}: '{}'", field_name, token));
    }
    token
        .parse::<u32>()
        .map_err(|e| format!("invalid decimal {}: '{}' ({})", field_name, token, e))
}

/// Text after the first delimiter, trimmed; empty when there is none
pub fn extract_gloss(line: &str, delimiter: char) -> &str {
    match line.find(delimiter) {
        Some(index) => line[index + delimiter.len_utf8()..].trim(),
        None => "",
    }
}
