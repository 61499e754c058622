//! Description comments above properties.
//!
//! A generated comment is a single `// <description>` line placed directly
//! above the property it documents, at the property's indentation. Only the
//! nearest non-blank line above a property is ever inspected or touched.

use serde_json::Value;

use crate::config::CommentMode;
use crate::error::EditError;
use crate::jsonc::edit::{line_start, starts_line};
use crate::jsonc::parse_tree;
use crate::merge::EditOp;
use crate::path::{Path, Segment};
use crate::schema::Schema;
use crate::skeleton::{normalize_description, CommentMap};
use crate::walker::visit_object_array_items;

/// The line span (without its newline) of the nearest non-blank line ending
/// before `offset`, which must be a line start.
fn line_above(text: &str, offset: usize) -> Option<(usize, usize)> {
    let mut end = offset;
    while end > 0 {
        // `end - 1` is the newline terminating the previous line.
        let content_end = end - 1;
        let start = line_start(text, content_end);
        if !text[start..content_end].trim().is_empty() {
            return Some((start, content_end));
        }
        end = start;
    }
    None
}

fn is_line_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

/// Locate the property at `path` when it begins its own line; returns the
/// offset of that line's start and the property's indentation.
fn property_line<'t>(text: &'t str, path: &Path) -> Result<Option<(usize, &'t str)>, EditError> {
    let root = parse_tree(text)?;
    let Some(prop) = root.find_property(path) else {
        return Ok(None);
    };
    let start = prop.span.start;
    if !starts_line(text, start) {
        return Ok(None);
    }
    let line = line_start(text, start);
    Ok(Some((line, &text[line..start])))
}

/// Place `// <description>` above the property at `path`.
///
/// Returns `None` when there is nothing to do: the property is missing or
/// shares its line with something else, the comment is already there, or a
/// differing comment is present and `mode` is [`CommentMode::Keep`].
pub fn insert_comment(
    text: &str,
    path: &Path,
    description: &str,
    mode: CommentMode,
) -> Result<Option<String>, EditError> {
    let Some((line, indent)) = property_line(text, path)? else {
        return Ok(None);
    };
    let wanted = format!("// {description}");

    match line_above(text, line) {
        Some((start, end)) if is_line_comment(&text[start..end]) => {
            if text[start..end].trim() == wanted || mode == CommentMode::Keep {
                return Ok(None);
            }
            let mut out = String::with_capacity(text.len() + wanted.len());
            out.push_str(&text[..start]);
            out.push_str(indent);
            out.push_str(&wanted);
            out.push_str(&text[end..]);
            Ok(Some(out))
        }
        _ => {
            let mut out = String::with_capacity(text.len() + indent.len() + wanted.len() + 1);
            out.push_str(&text[..line]);
            out.push_str(indent);
            out.push_str(&wanted);
            out.push('\n');
            out.push_str(&text[line..]);
            Ok(Some(out))
        }
    }
}

/// Remove the `// <description>` line directly above the property at
/// `path`, if that is exactly what is there.
pub fn remove_comment(text: &str, path: &Path, description: &str) -> Result<Option<String>, EditError> {
    let Some((line, _)) = property_line(text, path)? else {
        return Ok(None);
    };
    let wanted = format!("// {description}");
    match line_above(text, line) {
        Some((start, end)) if text[start..end].trim() == wanted => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..start]);
            out.push_str(&text[end + 1..]);
            Ok(Some(out))
        }
        _ => Ok(None),
    }
}

/// One comment operation per documented path.
pub fn sync_ops(comments: &CommentMap, mode: CommentMode) -> Vec<EditOp> {
    comments
        .iter()
        .map(|(path, text)| EditOp::Comment {
            path: path.clone(),
            text: text.clone(),
            mode,
        })
        .collect()
}

/// Removal operations for generated item comments in every array element
/// after the first. Comments that differ from the description are left
/// alone.
pub fn strip_ops(schema: &Schema, value: &Value) -> Vec<EditOp> {
    let mut ops = Vec::new();
    visit_object_array_items(schema, value, &mut |item, path, element| {
        if !matches!(path.segments().last(), Some(Segment::Index(i)) if *i >= 1) {
            return;
        }
        let Some(item_obj) = item.as_object() else {
            return;
        };
        for (key, prop) in &item_obj.properties {
            if element.get(key).is_none() {
                continue;
            }
            if let Some(text) = prop.description.as_deref().and_then(normalize_description) {
                ops.push(EditOp::Uncomment {
                    path: path.child(key),
                    text,
                });
            }
        }
    });
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn add(text: &str, path: &str, desc: &str, mode: CommentMode) -> Option<String> {
        insert_comment(text, &Path::parse(path), desc, mode).unwrap()
    }

    #[test]
    fn test_insert_above_property() {
        let text = "{\n    \"log\": {\n        \"dir\": \"x\"\n    }\n}\n";
        assert_eq!(
            add(text, "log.dir", "full path to log", CommentMode::Refresh).unwrap(),
            "{\n    \"log\": {\n        // full path to log\n        \"dir\": \"x\"\n    }\n}\n"
        );
    }

    #[test]
    fn test_matching_comment_is_left_alone() {
        let text = "{\n    // full path to log\n    \"dir\": \"x\"\n}\n";
        assert_eq!(add(text, "dir", "full path to log", CommentMode::Refresh), None);
    }

    #[test]
    fn test_differing_comment_refreshed() {
        let text = "{\n    //full path to log\n    \"dir\": \"x\"\n}\n";
        assert_eq!(
            add(text, "dir", "full path to log", CommentMode::Refresh).unwrap(),
            "{\n    // full path to log\n    \"dir\": \"x\"\n}\n"
        );
    }

    #[test]
    fn test_differing_comment_kept() {
        let text = "{\n    // my own note\n    \"dir\": \"x\"\n}\n";
        assert_eq!(add(text, "dir", "full path to log", CommentMode::Keep), None);
    }

    #[test]
    fn test_comment_across_blank_line_counts() {
        let text = "{\n    // note\n\n    \"dir\": \"x\"\n}\n";
        assert_eq!(add(text, "dir", "note", CommentMode::Refresh), None);
    }

    #[test]
    fn test_trailing_comment_on_previous_member_is_not_a_match() {
        let text = "{\n    \"a\": 1, // note\n    \"b\": 2\n}\n";
        let out = add(text, "b", "note", CommentMode::Refresh).unwrap();
        assert_eq!(out, "{\n    \"a\": 1, // note\n    // note\n    \"b\": 2\n}\n");
    }

    #[test]
    fn test_property_sharing_a_line_is_skipped() {
        let text = r#"{"a": 1}"#;
        assert_eq!(add(text, "a", "one", CommentMode::Refresh), None);
    }

    #[test]
    fn test_missing_property_is_skipped() {
        assert_eq!(add("{}\n", "a", "one", CommentMode::Refresh), None);
    }

    #[test]
    fn test_remove_only_exact_comment() {
        let text = "{\n    // demo\n    \"a\": 1,\n    // hand note\n    \"b\": 2\n}\n";
        let out = remove_comment(text, &Path::parse("a"), "demo").unwrap().unwrap();
        assert_eq!(out, "{\n    \"a\": 1,\n    // hand note\n    \"b\": 2\n}\n");
        assert_eq!(remove_comment(text, &Path::parse("b"), "demo").unwrap(), None);
    }

    #[test]
    fn test_strip_ops_skip_first_element() {
        let item = Schema::object()
            .property("name", Schema::string().describe("item name"))
            .property("id", Schema::integer())
            .build();
        let schema = Schema::object().property("list", Schema::array(item)).build();
        let value = json!({ "list": [{ "name": "a" }, { "name": "b" }, { "id": 3 }] });
        let ops = strip_ops(&schema, &value);
        assert_eq!(
            ops,
            vec![EditOp::Uncomment {
                path: Path::parse("list.1.name"),
                text: "item name".to_string(),
            }]
        );
    }
}
