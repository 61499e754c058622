//! Tokenizer for JSON with `//` and `/* */` comments.
//!
//! Offsets are byte offsets into the source. Every structural character is
//! ASCII, so token boundaries are always valid `str` slice boundaries.
//! String and number literals are validated with `serde_json` so the literal
//! grammar matches strict JSON exactly.

use crate::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    String,
    Number,
    True,
    False,
    Null,
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// Line breaks in the whitespace directly before this token.
    pub newlines_before: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.kind, TokenKind::OpenBrace | TokenKind::OpenBracket)
    }

    pub fn is_close(&self) -> bool {
        matches!(self.kind, TokenKind::CloseBrace | TokenKind::CloseBracket)
    }
}

/// Split `text` into tokens, comments included.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = if text.starts_with('\u{feff}') { 3 } else { 0 };
    let mut newlines = 0;

    while pos < bytes.len() {
        let start = pos;
        let kind = match bytes[pos] {
            b'\n' => {
                newlines += 1;
                pos += 1;
                continue;
            }
            b' ' | b'\t' | b'\r' => {
                pos += 1;
                continue;
            }
            b'{' => single(&mut pos, TokenKind::OpenBrace),
            b'}' => single(&mut pos, TokenKind::CloseBrace),
            b'[' => single(&mut pos, TokenKind::OpenBracket),
            b']' => single(&mut pos, TokenKind::CloseBracket),
            b':' => single(&mut pos, TokenKind::Colon),
            b',' => single(&mut pos, TokenKind::Comma),
            b'"' => {
                pos = scan_string(text, start)?;
                TokenKind::String
            }
            b'/' => match bytes.get(pos + 1) {
                Some(b'/') => {
                    pos = bytes[pos..]
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(bytes.len(), |i| pos + i);
                    TokenKind::LineComment
                }
                Some(b'*') => {
                    pos = text[pos + 2..]
                        .find("*/")
                        .map(|i| pos + 2 + i + 2)
                        .ok_or_else(|| {
                            ParseError::new(ParseErrorKind::UnterminatedComment, start)
                        })?;
                    TokenKind::BlockComment
                }
                _ => return Err(unexpected(text, start)),
            },
            b'-' | b'0'..=b'9' => {
                pos = scan_number(text, start)?;
                TokenKind::Number
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
                    pos += 1;
                }
                match &text[start..pos] {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "null" => TokenKind::Null,
                    _ => return Err(unexpected(text, start)),
                }
            }
            _ => return Err(unexpected(text, start)),
        };

        tokens.push(Token {
            kind,
            start,
            end: pos,
            newlines_before: newlines,
        });
        newlines = 0;
    }

    Ok(tokens)
}

fn single(pos: &mut usize, kind: TokenKind) -> TokenKind {
    *pos += 1;
    kind
}

fn unexpected(text: &str, offset: usize) -> ParseError {
    let ch = text[offset..].chars().next().unwrap_or('\0');
    ParseError::new(ParseErrorKind::UnexpectedCharacter(ch), offset)
}

/// Scan a string literal starting at the opening quote; returns the offset
/// just past the closing quote.
fn scan_string(text: &str, start: usize) -> Result<usize, ParseError> {
    let bytes = text.as_bytes();
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => {
                let end = pos + 1;
                decode_string(&text[start..end], start)?;
                return Ok(end);
            }
            b'\n' => break,
            _ => pos += 1,
        }
    }
    Err(ParseError::new(ParseErrorKind::UnterminatedString, start))
}

fn scan_number(text: &str, start: usize) -> Result<usize, ParseError> {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < bytes.len()
        && matches!(bytes[pos], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
    {
        pos += 1;
    }
    decode_number(&text[start..pos], start)?;
    Ok(pos)
}

/// Decode a quoted string literal (quotes included).
pub(crate) fn decode_string(literal: &str, offset: usize) -> Result<String, ParseError> {
    serde_json::from_str(literal)
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidString, offset))
}

pub(crate) fn decode_number(literal: &str, offset: usize) -> Result<serde_json::Number, ParseError> {
    serde_json::from_str(literal)
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, offset))
}
