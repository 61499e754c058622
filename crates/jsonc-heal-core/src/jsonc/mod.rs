//! JSONC text handling: tokenizing, parsing with offsets, path-addressed
//! insertion and canonical formatting.
//!
//! The pipeline never edits a value tree and re-serializes it, since that
//! would lose comments and user formatting. Every change is a splice into
//! the text, located through a fresh [`tree::parse_tree`].

pub mod edit;
pub mod format;
pub mod scanner;
pub mod tree;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

pub use edit::{apply_edits, insert_property, to_text_at, Edit};
pub use format::format;
pub use tree::{parse_tree, parse_value, Node, NodeKind, Span, MAX_NESTING_DEPTH};

/// One indentation level.
pub const INDENT: &str = "    ";

/// Serialize `value` as four-space pretty JSON with a trailing newline.
pub fn to_text(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    let mut text = String::from_utf8_lossy(&buf).into_owned();
    text.push('\n');
    Ok(text)
}
