//! Skeleton derivation: the canonical default document for a schema.
//!
//! [`build`] walks an Object schema and produces the value a fresh document
//! should hold, together with a [`CommentMap`] of the descriptions that
//! document its properties. The walk is a pure function of its inputs.
//!
//! Per declared property, the first matching rule decides the value:
//!
//! 1. a `default` is deep-copied;
//! 2. a `const` is used as is;
//! 3. a union is resolved (hints, then the current sub-value) and the chosen
//!    branch is treated as the property's schema;
//! 4. an object recurses, and an object with no properties becomes `{}`;
//! 5. an array of objects gets one representative item, but only when that
//!    item would hold at least one non-null value;
//! 6. any other array becomes `[]`;
//! 7. everything else is `null`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::path::{Path, VariantHint};
use crate::resolver::{resolve_by_hints, resolve_nested_union};
use crate::schema::{Schema, Shape};

/// Description text per document path, in discovery order.
pub type CommentMap = IndexMap<Path, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    /// `None` when the schema is not an object or declares no properties.
    pub value: Option<Value>,
    pub comments: CommentMap,
}

/// Derive the skeleton of `schema` rooted at `prefix`.
///
/// `hints` are relative to `prefix`. `current` is the existing value at
/// `prefix`, used to resolve nested unions the way the document already
/// leans.
pub fn build(
    schema: &Schema,
    prefix: &Path,
    hints: &[VariantHint],
    current: Option<&Value>,
) -> Skeleton {
    let mut comments = CommentMap::new();
    let value = build_object(schema, prefix, hints, current, &mut comments);
    Skeleton { value, comments }
}

/// Collapse internal whitespace so a description fits one comment line.
/// Blank descriptions yield `None`.
pub fn normalize_description(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!joined.is_empty()).then_some(joined)
}

fn record(comments: &mut CommentMap, path: &Path, schema: &Schema) {
    if let Some(text) = schema.description.as_deref().and_then(normalize_description) {
        comments.insert(path.clone(), text);
    }
}

fn build_object(
    schema: &Schema,
    prefix: &Path,
    hints: &[VariantHint],
    current: Option<&Value>,
    comments: &mut CommentMap,
) -> Option<Value> {
    let Shape::Object(obj) = &schema.shape else {
        if !prefix.is_empty() {
            record(comments, prefix, schema);
        }
        return None;
    };

    let mut out = Map::new();
    for (key, prop) in &obj.properties {
        let path = prefix.child(key);
        let sub_hints = VariantHint::rebase(hints, key);
        let sub_current = current.and_then(|c| c.get(key));
        let value = build_property(prop, &path, &sub_hints, sub_current, comments);
        out.insert(key.clone(), value);
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

fn build_property(
    prop: &Schema,
    path: &Path,
    hints: &[VariantHint],
    current: Option<&Value>,
    comments: &mut CommentMap,
) -> Value {
    if let Some(default) = &prop.default {
        record(comments, path, prop);
        let non_empty_array = matches!(default, Value::Array(items) if !items.is_empty());
        if let Some(item) = prop.items().map(item_schema).filter(|_| non_empty_array) {
            if let Some(item_obj) = item.as_object() {
                let first = path.index(0);
                for (key, item_prop) in &item_obj.properties {
                    record(comments, &first.child(key), item_prop);
                }
            }
        }
        return default.clone();
    }

    if let Some(value) = &prop.const_value {
        record(comments, path, prop);
        return value.clone();
    }

    let value = match &prop.shape {
        Shape::Union(_) => {
            let chosen = resolve_nested_union(prop, hints, current);
            if std::ptr::eq(chosen, prop) {
                Value::Null
            } else {
                tracing::debug!(path = %path, "resolved nested union");
                build_property(chosen, path, hints, current, comments)
            }
        }
        Shape::Object(_) => build_object(prop, path, hints, current, comments)
            .unwrap_or_else(|| Value::Object(Map::new())),
        Shape::Array(items) => {
            let item = item_schema(items);
            match &item.shape {
                Shape::Object(_) => {
                    let synthetic = build(item, &path.index(0), &[], None);
                    comments.extend(synthetic.comments);
                    match synthetic.value {
                        Some(Value::Object(fields)) if fields.values().any(|v| !v.is_null()) => {
                            Value::Array(vec![Value::Object(fields)])
                        }
                        _ => Value::Array(Vec::new()),
                    }
                }
                _ => Value::Array(Vec::new()),
            }
        }
        Shape::Leaf(_) => Value::Null,
    };
    // The property's own description wins over the chosen branch's.
    record(comments, path, prop);
    value
}

/// Array items as a synthetic element sees them: unions take their first
/// branch.
pub(crate) fn item_schema(items: &Schema) -> &Schema {
    resolve_by_hints(items, &[])
}
