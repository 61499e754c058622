//! Path-addressed text edits.
//!
//! An [`Edit`] is a splice against a specific text snapshot. Edits are
//! computed from a fresh parse of the text they will be applied to; callers
//! that apply several inserts in sequence must recompute after each one.

use serde_json::{Map, Value};

use super::tree::{parse_tree, Node, NodeKind};
use super::INDENT;
use crate::error::EditError;
use crate::path::{Path, Segment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub length: usize,
    pub content: String,
}

/// Apply non-overlapping edits computed against `text`.
pub fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut sorted: Vec<&Edit> = edits.iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));
    let mut out = text.to_string();
    for edit in sorted {
        out.replace_range(edit.offset..edit.offset + edit.length, &edit.content);
    }
    out
}

/// Compute the edit that adds `value` as a new property at `path`.
///
/// Returns no edits when the property already exists; existing values are
/// never overwritten. Missing intermediate objects are created by inserting
/// a wrapping object at the deepest existing ancestor.
pub fn insert_property(text: &str, path: &Path, value: &Value) -> Result<Vec<Edit>, EditError> {
    let root = parse_tree(text)?;
    insert_into(text, &root, path, value)
}

fn insert_into(text: &str, root: &Node, path: &Path, value: &Value) -> Result<Vec<Edit>, EditError> {
    let Some((last, parent_path)) = path.split_last() else {
        return Err(EditError::RootPath);
    };

    let Some(parent) = root.find(&parent_path) else {
        // Only objects can be synthesized; a missing array element cannot.
        let parent_is_keyed = matches!(parent_path.split_last(), Some((Segment::Key(_), _)));
        return match last {
            Segment::Key(key) if parent_is_keyed => {
                let mut wrapped = Map::new();
                wrapped.insert(key.clone(), value.clone());
                insert_into(text, root, &parent_path, &Value::Object(wrapped))
            }
            _ => Err(EditError::MissingParent {
                path: parent_path.to_string(),
            }),
        };
    };

    let (NodeKind::Object { trailing_comma }, Segment::Key(key)) = (&parent.kind, last) else {
        return Err(EditError::NotAnObject {
            path: parent_path.to_string(),
        });
    };
    if parent.property(key).is_some() {
        return Ok(Vec::new());
    }

    let parent_indent = line_indent(text, parent.span.start);
    let edit = match parent.children.last() {
        Some(last_member) => {
            let indent = if starts_line(text, last_member.span.start) {
                line_indent(text, last_member.span.start).to_string()
            } else {
                format!("{parent_indent}{INDENT}")
            };
            let entry = render_entry(key, value, &indent)?;
            // A line comment trailing the last member stays on its line.
            match trailing_comma {
                Some(comma) => {
                    let offset = line_comment_end(text, comma + 1).unwrap_or(comma + 1);
                    return Ok(vec![Edit {
                        offset,
                        length: 0,
                        content: format!("\n{indent}{entry},"),
                    }]);
                }
                None => match line_comment_end(text, last_member.span.end) {
                    Some(end) => {
                        return Ok(vec![
                            Edit {
                                offset: last_member.span.end,
                                length: 0,
                                content: ",".to_string(),
                            },
                            Edit {
                                offset: end,
                                length: 0,
                                content: format!("\n{indent}{entry}"),
                            },
                        ]);
                    }
                    None => Edit {
                        offset: last_member.span.end,
                        length: 0,
                        content: format!(",\n{indent}{entry}"),
                    },
                },
            }
        }
        None => {
            let indent = format!("{parent_indent}{INDENT}");
            let entry = render_entry(key, value, &indent)?;
            let inner_start = parent.span.start + 1;
            let inner = &text[inner_start..parent.span.end - 1];
            if inner.trim().is_empty() {
                Edit {
                    offset: inner_start,
                    length: inner.len(),
                    content: format!("\n{indent}{entry}\n{parent_indent}"),
                }
            } else {
                // Only comments inside; keep them after the new member.
                Edit {
                    offset: inner_start,
                    length: 0,
                    content: format!("\n{indent}{entry}"),
                }
            }
        }
    };
    Ok(vec![edit])
}

fn render_entry(key: &str, value: &Value, indent: &str) -> Result<String, EditError> {
    Ok(format!(
        "{}: {}",
        serde_json::to_string(key)?,
        to_text_at(value, indent)?
    ))
}

/// Serialize `value` as pretty JSON whose continuation lines start at `indent`.
pub fn to_text_at(value: &Value, indent: &str) -> Result<String, EditError> {
    let pretty = serde_json::to_string_pretty(value)?;
    // serde_json indents by two spaces; string literals never contain raw
    // newlines, so every continuation line begins with indentation only.
    let mut out = String::with_capacity(pretty.len() * 2);
    for (i, line) in pretty.lines().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(indent);
            let body = line.trim_start_matches(' ');
            let levels = (line.len() - body.len()) / 2;
            out.push_str(&INDENT.repeat(levels));
            out.push_str(body);
        } else {
            out.push_str(line);
        }
    }
    Ok(out)
}

/// End of the line when only a `//` comment follows `offset` on it.
fn line_comment_end(text: &str, offset: usize) -> Option<usize> {
    let rest = &text[offset..];
    let line = rest.find('\n').map_or(rest, |i| &rest[..i]);
    line.trim_start_matches([' ', '\t'])
        .starts_with("//")
        .then_some(offset + line.len())
}

pub(crate) fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Leading whitespace of the line containing `offset`.
pub(crate) fn line_indent(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = &text[start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Whether only whitespace precedes `offset` on its line.
pub(crate) fn starts_line(text: &str, offset: usize) -> bool {
    text[line_start(text, offset)..offset].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonc::parse_value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn insert(text: &str, path: &str, value: Value) -> String {
        let edits = insert_property(text, &Path::parse(path), &value).unwrap();
        apply_edits(text, &edits)
    }

    #[test]
    fn test_insert_after_last_member() {
        let text = "{\n    \"a\": 1\n}\n";
        assert_eq!(insert(text, "b", json!(2)), "{\n    \"a\": 1,\n    \"b\": 2\n}\n");
    }

    #[test]
    fn test_insert_into_empty_object() {
        let text = "{\n    \"outer\": {}\n}\n";
        assert_eq!(
            insert(text, "outer.inner", json!("x")),
            "{\n    \"outer\": {\n        \"inner\": \"x\"\n    }\n}\n"
        );
    }

    #[test]
    fn test_insert_object_value_is_indented() {
        let text = "{}\n";
        assert_eq!(
            insert(text, "obj", json!({ "k": [1] })),
            "{\n    \"obj\": {\n        \"k\": [\n            1\n        ]\n    }\n}\n"
        );
    }

    #[test]
    fn test_insert_respects_trailing_comma() {
        let text = "{\n    \"a\": 1,\n}";
        let out = insert(text, "b", json!(true));
        assert_eq!(out, "{\n    \"a\": 1,\n    \"b\": true,\n}");
        assert_eq!(parse_value(&out).unwrap(), json!({ "a": 1, "b": true }));
    }

    #[test]
    fn test_insert_keeps_trailing_line_comment_valid() {
        let text = "{\n    \"a\": 1 // note\n}";
        let out = insert(text, "b", json!(2));
        assert_eq!(parse_value(&out).unwrap(), json!({ "a": 1, "b": 2 }));
        assert!(out.contains("// note"));
    }

    #[test]
    fn test_line_comment_stays_with_its_member() {
        let text = "{\n    \"a\": 1 // note\n}";
        assert_eq!(insert(text, "b", json!(2)), "{\n    \"a\": 1, // note\n    \"b\": 2\n}");
    }

    #[test]
    fn test_line_comment_after_trailing_comma_stays() {
        let text = "{\n    \"a\": 5, // tail\n}";
        let out = insert(text, "b", json!("x"));
        assert_eq!(out, "{\n    \"a\": 5, // tail\n    \"b\": \"x\",\n}");
        assert_eq!(parse_value(&out).unwrap(), json!({ "a": 5, "b": "x" }));
    }

    #[test]
    fn test_insert_into_comment_only_object() {
        let text = "{\n    // nothing yet\n}";
        let out = insert(text, "a", json!(1));
        assert_eq!(parse_value(&out).unwrap(), json!({ "a": 1 }));
        assert!(out.contains("// nothing yet"));
    }

    #[test]
    fn test_existing_property_not_overwritten() {
        let text = r#"{"a": "user value"}"#;
        let edits = insert_property(text, &Path::parse("a"), &json!("default")).unwrap();
        assert!(edits.is_empty());
    }

    #[test]
    fn test_missing_parents_are_created() {
        let text = "{}";
        let out = insert(text, "a.b.c", json!(1));
        assert_eq!(parse_value(&out).unwrap(), json!({ "a": { "b": { "c": 1 } } }));
    }

    #[test]
    fn test_insert_into_array_element() {
        let text = r#"{"items": [{"a": 1}, {"a": 2}]}"#;
        let out = insert(text, "items.1.b", json!(null));
        assert_eq!(
            parse_value(&out).unwrap(),
            json!({ "items": [{ "a": 1 }, { "a": 2, "b": null }] })
        );
    }

    #[test]
    fn test_scalar_parent_rejected() {
        let text = r#"{"objects": "oops"}"#;
        let err = insert_property(text, &Path::parse("objects.schema"), &json!({})).unwrap_err();
        assert!(matches!(err, EditError::NotAnObject { .. }));
    }

    #[test]
    fn test_root_path_rejected() {
        assert!(matches!(
            insert_property("{}", &Path::root(), &json!(1)),
            Err(EditError::RootPath)
        ));
    }

    #[test]
    fn test_missing_array_element_rejected() {
        let text = r#"{"items": []}"#;
        let err = insert_property(text, &Path::parse("items.0.a"), &json!(1)).unwrap_err();
        assert!(matches!(err, EditError::MissingParent { .. }));
    }

    #[test]
    fn test_to_text_at_reindents_nested_values() {
        let out = to_text_at(&json!({ "a": { "b": 1 } }), "    ").unwrap();
        assert_eq!(out, "{\n        \"a\": {\n            \"b\": 1\n        }\n    }");
    }
}
