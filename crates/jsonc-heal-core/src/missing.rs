//! Missing-field collection.
//!
//! Compares an existing document value with the skeleton it should contain
//! and lists the additions that would complete it. Nothing here proposes
//! changing or removing what already exists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{Path, Segment};
use crate::schema::{Schema, Shape};
use crate::skeleton;
use crate::walker::visit_object_array_items;

/// A property absent from the document, with the value it should get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub path: Path,
    pub value: Value,
}

/// Keys of `skeleton` absent from `current`, from the root.
pub fn diff(current: &Value, skeleton: &Value) -> Vec<MissingEntry> {
    diff_at(current, skeleton, &Path::root())
}

/// Keys of `skeleton` absent from `current`, where both sit at `base`.
///
/// An absent key yields one entry with the full skeleton subtree. When a
/// key is present on both sides and both values are maps, the comparison
/// recurses. Arrays are never descended.
pub fn diff_at(current: &Value, skeleton: &Value, base: &Path) -> Vec<MissingEntry> {
    let mut out = Vec::new();
    collect(current, skeleton, base, &mut out);
    out
}

fn collect(current: &Value, skeleton: &Value, base: &Path, out: &mut Vec<MissingEntry>) {
    let (Value::Object(current), Value::Object(skeleton)) = (current, skeleton) else {
        return;
    };
    for (key, expected) in skeleton {
        let path = base.child(key);
        match current.get(key) {
            None => out.push(MissingEntry {
                path,
                value: expected.clone(),
            }),
            Some(existing) => collect(existing, expected, &path, out),
        }
    }
}

/// Replace the value of every entry addressing an array property with `[]`.
///
/// `schema` describes the value at `base`; entry paths are absolute and
/// must lie below `base`. A property counts as an array when any union
/// branch along the way declares it so.
pub fn empty_arrays(entries: &mut [MissingEntry], schema: &Schema, base: &Path) {
    replace_arrays(entries, schema, base, |_| true);
}

fn replace_arrays(
    entries: &mut [MissingEntry],
    schema: &Schema,
    base: &Path,
    applies: impl Fn(&Schema) -> bool + Copy,
) {
    for entry in entries {
        let Some(relative) = entry.path.segments().get(base.len()..) else {
            continue;
        };
        if declares_array(schema, relative, applies) && !matches!(&entry.value, Value::Array(a) if a.is_empty()) {
            tracing::trace!(path = %entry.path, "inserting array property empty");
            entry.value = Value::Array(Vec::new());
        }
    }
}

fn declares_array(schema: &Schema, segments: &[Segment], applies: impl Fn(&Schema) -> bool + Copy) -> bool {
    if let Shape::Union(variants) = &schema.shape {
        return variants.iter().any(|v| declares_array(v, segments, applies));
    }
    match segments.split_first() {
        None => matches!(schema.shape, Shape::Array(_)) && applies(schema),
        Some((Segment::Key(key), rest)) => schema
            .as_object()
            .and_then(|obj| obj.properties.get(key))
            .is_some_and(|prop| declares_array(prop, rest, applies)),
        Some((Segment::Index(_), _)) => false,
    }
}

/// Fields missing from elements of arrays of objects anywhere in `value`.
///
/// Each element that is a map is compared with the skeleton of its item
/// schema, resolved against the element itself. Missing leaves get their
/// `default`, else `const`, else `null`; missing object and union properties
/// get their skeleton subtree. Missing array properties get their own
/// `default`, else `[]`.
pub fn missing_item_fields(schema: &Schema, value: &Value) -> Vec<MissingEntry> {
    let mut out = Vec::new();
    visit_object_array_items(schema, value, &mut |item, path, element| {
        let expected = skeleton::build(item, path, &[], Some(element));
        if let Some(expected) = expected.value {
            let mut entries = diff_at(element, &expected, path);
            replace_arrays(&mut entries, item, path, |prop| prop.default.is_none());
            out.extend(entries);
        }
    });
    out
}
