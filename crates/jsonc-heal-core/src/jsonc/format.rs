//! Canonical layout for JSONC text.
//!
//! Every member and array element goes on its own line, indented four
//! spaces per level. Comments are kept in place: a comment that shared a
//! line with the preceding token still does, one that started its own line
//! still does. A single blank line between members survives; runs of blank
//! lines collapse to one. Formatting already-formatted text is a no-op.

use super::scanner::{tokenize, Token, TokenKind};
use super::INDENT;
use crate::error::ParseError;

enum Separator {
    None,
    Space,
    Break,
}

/// Re-layout `text`. Fails only when `text` does not tokenize.
pub fn format(text: &str) -> Result<String, ParseError> {
    let tokens = tokenize(text)?;
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut depth = 0usize;
    let mut prev: Option<&Token> = None;

    for token in &tokens {
        if token.is_close() {
            depth = depth.saturating_sub(1);
        }
        if let Some(prev) = prev {
            match separator(prev, token) {
                Separator::None => {}
                Separator::Space => out.push(' '),
                Separator::Break => {
                    out.push('\n');
                    if token.newlines_before >= 2 && !prev.is_open() && !token.is_close() {
                        out.push('\n');
                    }
                    out.push_str(&INDENT.repeat(depth));
                }
            }
        }
        let raw = token.text(text);
        out.push_str(match token.kind {
            TokenKind::LineComment => raw.trim_end(),
            _ => raw,
        });
        if token.is_open() {
            depth += 1;
        }
        prev = Some(token);
    }

    out.push('\n');
    Ok(out)
}

fn separator(prev: &Token, cur: &Token) -> Separator {
    let closes_prev = matches!(
        (prev.kind, cur.kind),
        (TokenKind::OpenBrace, TokenKind::CloseBrace)
            | (TokenKind::OpenBracket, TokenKind::CloseBracket)
    );
    if closes_prev {
        return Separator::None;
    }
    if prev.kind == TokenKind::LineComment || prev.is_open() || cur.is_close() {
        return Separator::Break;
    }
    if matches!(cur.kind, TokenKind::Comma | TokenKind::Colon) {
        return Separator::None;
    }
    if prev.kind == TokenKind::BlockComment {
        return if cur.newlines_before > 0 {
            Separator::Break
        } else {
            Separator::Space
        };
    }
    match (prev.kind, cur.kind) {
        (TokenKind::Colon, _) => Separator::Space,
        _ if cur.is_comment() && cur.newlines_before == 0 => Separator::Space,
        _ => Separator::Break,
    }
}
