//! The live document and the edit operations folded over it.
//!
//! A [`Document`] pairs JSONC text with the value it parses to. Its text
//! always parses: [`Document::apply`] renders an [`EditOp`] against the
//! current text, re-parses the result, and keeps the previous state when
//! the op is a no-op or its output would not parse. Every op is located
//! against the text as it is at that moment, never against a stale
//! snapshot, so a sequence of ops is a plain left fold.

use serde_json::{Map, Value};

use crate::comments::{insert_comment, remove_comment};
use crate::config::CommentMode;
use crate::error::EditError;
use crate::jsonc::{apply_edits, format, insert_property, parse_value};
use crate::missing::{missing_item_fields, MissingEntry};
use crate::path::Path;
use crate::schema::Schema;

const EMPTY_DOCUMENT: &str = "{}\n";

#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Add a property that is not there yet.
    Insert { path: Path, value: Value },
    /// Ensure `// text` sits above the property at `path`.
    Comment {
        path: Path,
        text: String,
        mode: CommentMode,
    },
    /// Drop a `// text` line sitting above the property at `path`.
    Uncomment { path: Path, text: String },
    /// Re-layout the whole text.
    Format,
}

impl EditOp {
    /// Whether applying this op changes the document's data.
    pub fn is_structural(&self) -> bool {
        matches!(self, EditOp::Insert { .. })
    }
}

impl From<MissingEntry> for EditOp {
    fn from(entry: MissingEntry) -> Self {
        EditOp::Insert {
            path: entry.path,
            value: entry.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    text: String,
    value: Value,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            text: EMPTY_DOCUMENT.to_string(),
            value: Value::Object(Map::new()),
        }
    }
}

impl Document {
    /// Parse caller text. Blank text is the empty object; text that does not
    /// parse, or whose root is not an object, is replaced by it.
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        match parse_value(text) {
            Ok(value @ Value::Object(_)) => Self {
                text: text.to_string(),
                value,
            },
            Ok(_) => {
                tracing::warn!("document root is not an object, starting from an empty document");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "document does not parse, starting from an empty document");
                Self::default()
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.text, self.value)
    }

    /// Apply one op. The flag reports whether the text changed.
    pub fn apply(self, op: &EditOp) -> (Self, bool) {
        let rendered = match self.render(op) {
            Ok(Some(text)) if text != self.text => text,
            Ok(_) => return (self, false),
            Err(e) => {
                tracing::debug!(error = %e, ?op, "edit skipped");
                return (self, false);
            }
        };
        match parse_value(&rendered) {
            Ok(value) => {
                tracing::debug!(?op, "applied edit");
                (
                    Self {
                        text: rendered,
                        value,
                    },
                    true,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, ?op, "edit produced unparseable text, discarded");
                (self, false)
            }
        }
    }

    fn render(&self, op: &EditOp) -> Result<Option<String>, EditError> {
        match op {
            EditOp::Insert { path, value } => {
                let edits = insert_property(&self.text, path, value)?;
                Ok((!edits.is_empty()).then(|| apply_edits(&self.text, &edits)))
            }
            EditOp::Comment { path, text, mode } => insert_comment(&self.text, path, text, *mode),
            EditOp::Uncomment { path, text } => remove_comment(&self.text, path, text),
            EditOp::Format => Ok(Some(format(&self.text)?)),
        }
    }
}

/// Fold `ops` over `document` in order. The flag is true when at least one
/// structural op changed the text.
pub fn apply_all<I>(document: Document, ops: I) -> (Document, bool)
where
    I: IntoIterator<Item = EditOp>,
{
    ops.into_iter()
        .fold((document, false), |(document, changed), op| {
            let (document, modified) = document.apply(&op);
            (document, changed || (modified && op.is_structural()))
        })
}

/// Insert every entry, in order. The flag is true when any insert landed.
pub fn apply_missing<I>(document: Document, entries: I) -> (Document, bool)
where
    I: IntoIterator<Item = MissingEntry>,
{
    apply_all(document, entries.into_iter().map(EditOp::from))
}

/// Complete every map element of every array of objects in the document.
pub fn heal_array_items(schema: &Schema, document: Document) -> (Document, bool) {
    let entries = missing_item_fields(schema, document.value());
    if entries.is_empty() {
        return (document, false);
    }
    tracing::debug!(entries = entries.len(), "healing array elements");
    apply_missing(document, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missing::diff;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn insert(path: &str, value: Value) -> EditOp {
        EditOp::Insert {
            path: Path::parse(path),
            value,
        }
    }

    #[test]
    fn test_blank_and_broken_input_degrade_to_empty() {
        for input in ["", "   \n", "{ \"a\": ", "[1, 2]", "42"] {
            let doc = Document::parse(input);
            assert_eq!(doc.text(), "{}\n", "input {input:?}");
            assert_eq!(doc.value(), &json!({}));
        }
    }

    #[test]
    fn test_parse_keeps_text_verbatim() {
        let text = "{ // hi\n  \"a\": 1 }";
        let doc = Document::parse(text);
        assert_eq!(doc.text(), text);
        assert_eq!(doc.value(), &json!({ "a": 1 }));
    }

    #[test]
    fn test_fold_regrounds_after_each_insert() {
        let skeleton = json!({
            "objects": {
                "sequence": { "dir": "seq" },
                "synonym": { "dir": "syn" },
                "job": { "dir": "job" }
            }
        });
        let doc = Document::parse("{\n    \"objects\": {\n        \"sequence\": {}\n    }\n}\n");
        let ops = diff(doc.value(), &skeleton).into_iter().map(EditOp::from);
        let (doc, changed) = apply_all(doc, ops);
        assert!(changed);
        assert_eq!(doc.value(), &skeleton);
    }

    #[test]
    fn test_existing_values_are_not_overwritten() {
        let doc = Document::parse(r#"{"a": "mine"}"#);
        let (doc, changed) = apply_all(doc, vec![insert("a", json!("default"))]);
        assert!(!changed);
        assert_eq!(doc.value(), &json!({ "a": "mine" }));
    }

    #[test]
    fn test_unaddressable_insert_is_a_no_op() {
        let doc = Document::parse(r#"{"a": "scalar"}"#);
        let (doc, changed) = apply_all(doc, vec![insert("a.b", json!(1)), insert("c", json!(2))]);
        assert!(changed);
        assert_eq!(doc.value(), &json!({ "a": "scalar", "c": 2 }));
    }

    #[test]
    fn test_heal_array_items_fills_later_elements() {
        let item = Schema::object()
            .property("name", Schema::string())
            .property("on", Schema::boolean().with_default(true))
            .build();
        let schema = Schema::object().property("list", Schema::array(item)).build();
        let doc = Document::parse("{\n    \"list\": [\n        {\"name\": \"a\", \"on\": false},\n        {}\n    ]\n}\n");
        let (doc, changed) = heal_array_items(&schema, doc);
        assert!(changed);
        assert_eq!(
            doc.value(),
            &json!({ "list": [{ "name": "a", "on": false }, { "name": null, "on": true }] })
        );
        let (_, again) = heal_array_items(&schema, doc);
        assert!(!again);
    }

    #[test]
    fn test_comment_and_format_ops_are_not_structural() {
        let doc = Document::parse("{\"a\": 1}");
        let ops = vec![
            EditOp::Format,
            EditOp::Comment {
                path: Path::parse("a"),
                text: "the a".to_string(),
                mode: CommentMode::Refresh,
            },
        ];
        let (doc, changed) = apply_all(doc, ops);
        assert!(!changed);
        assert_eq!(doc.text(), "{\n    // the a\n    \"a\": 1\n}\n");
    }
}
