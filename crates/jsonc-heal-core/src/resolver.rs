//! Union branch selection.
//!
//! Every function here is total: when nothing discriminates between the
//! branches of a [`Shape::Union`], the first declared branch wins. A union
//! with no branches resolves to itself.
//!
//! Two sources of evidence are supported:
//!
//! * **hints**: `(path, value)` pairs supplied before any document exists.
//!   A branch fits when every hint path leads to a node whose `const` equals
//!   the hint value or whose `enum` contains it.
//! * **data**: an existing value. Each branch is scored by walking its
//!   object properties against the value: +2 per matching `const`, +1 per
//!   matching `enum`. Ties go to declaration order.

use serde_json::{Map, Value};

use crate::path::{Segment, VariantHint};
use crate::schema::{Schema, Shape};

/// Pick a branch for `schema` from caller hints alone.
pub fn resolve_by_hints<'s>(schema: &'s Schema, hints: &[VariantHint]) -> &'s Schema {
    let Some(variants) = branches(schema) else {
        return schema;
    };
    if let Some(chosen) = fitting_variant(variants, hints) {
        return chosen;
    }
    if !hints.is_empty() {
        tracing::warn!(
            hints = hints.len(),
            "no union branch matches the given hints, using the first branch"
        );
    }
    &variants[0]
}

/// Pick a branch for `schema` by scoring it against `data`.
pub fn resolve_by_data<'s>(schema: &'s Schema, data: &Value) -> &'s Schema {
    let Some(variants) = branches(schema) else {
        return schema;
    };
    match data {
        Value::Object(map) => best_scoring(variants, map),
        _ => &variants[0],
    }
}

/// Pick a branch for a union nested below the root.
///
/// `hints` must already be relative to the union's own location. Hints are
/// tried first; failing that, a map-valued `current` is scored.
pub fn resolve_nested_union<'s>(
    union: &'s Schema,
    hints: &[VariantHint],
    current: Option<&Value>,
) -> &'s Schema {
    let Some(variants) = branches(union) else {
        return union;
    };
    if !hints.is_empty() {
        if let Some(chosen) = fitting_variant(variants, hints) {
            return chosen;
        }
    }
    match current {
        Some(Value::Object(map)) => best_scoring(variants, map),
        _ => {
            if !hints.is_empty() {
                tracing::warn!(
                    hints = hints.len(),
                    "no nested union branch matches the given hints, using the first branch"
                );
            }
            &variants[0]
        }
    }
}

/// Pick the branch a concrete `value` most plausibly belongs to.
///
/// Maps are scored like [`resolve_by_data`]. Anything else takes the first
/// branch whose shape, `const` or `enum` accepts it.
pub fn resolve_for_value<'s>(schema: &'s Schema, value: &Value) -> &'s Schema {
    let Some(variants) = branches(schema) else {
        return schema;
    };
    if let Value::Object(map) = value {
        return best_scoring_where(variants, map, |v| matches!(v.shape, Shape::Object(_)));
    }
    variants
        .iter()
        .find(|v| accepts_scalar(v, value))
        .unwrap_or(&variants[0])
}

fn branches(schema: &Schema) -> Option<&[Schema]> {
    schema.variants().filter(|variants| !variants.is_empty())
}

fn fitting_variant<'s>(variants: &'s [Schema], hints: &[VariantHint]) -> Option<&'s Schema> {
    if hints.is_empty() {
        return None;
    }
    variants.iter().find(|variant| {
        hints
            .iter()
            .all(|hint| hint_fits(variant, hint.path.segments(), &hint.value))
    })
}

fn hint_fits(node: &Schema, segments: &[Segment], value: &Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return node.matches_discriminant(value)
            || node
                .variants()
                .is_some_and(|vs| vs.iter().any(|v| hint_fits(v, segments, value)));
    };
    match (&node.shape, head) {
        (Shape::Object(obj), Segment::Key(key)) => obj
            .properties
            .get(key)
            .is_some_and(|prop| hint_fits(prop, rest, value)),
        (Shape::Array(items), Segment::Index(_)) => hint_fits(items, rest, value),
        (Shape::Union(variants), _) => variants.iter().any(|v| hint_fits(v, segments, value)),
        _ => false,
    }
}

fn best_scoring<'s>(variants: &'s [Schema], data: &Map<String, Value>) -> &'s Schema {
    best_scoring_where(variants, data, |_| true)
}

fn best_scoring_where<'s>(
    variants: &'s [Schema],
    data: &Map<String, Value>,
    eligible: impl Fn(&Schema) -> bool,
) -> &'s Schema {
    let mut best = &variants[0];
    let mut best_score = None;
    for (index, variant) in variants.iter().enumerate() {
        if !eligible(variant) {
            continue;
        }
        let points = score(variant, data);
        if best_score.map_or(true, |top| points > top) {
            tracing::debug!(branch = index, points, "scored union branch");
            best = variant;
            best_score = Some(points);
        }
    }
    best
}

fn score(schema: &Schema, data: &Map<String, Value>) -> u32 {
    let Shape::Object(obj) = &schema.shape else {
        return 0;
    };
    obj.properties
        .iter()
        .map(|(key, prop)| {
            let Some(value) = data.get(key) else {
                return 0;
            };
            let own = if prop.const_value.as_ref() == Some(value) {
                2
            } else if prop
                .enum_values
                .as_ref()
                .is_some_and(|values| values.contains(value))
            {
                1
            } else {
                0
            };
            let nested = match (&prop.shape, value) {
                (Shape::Object(_), Value::Object(sub)) => score(prop, sub),
                (Shape::Union(variants), Value::Object(sub)) => {
                    variants.iter().map(|v| score(v, sub)).max().unwrap_or(0)
                }
                _ => 0,
            };
            own + nested
        })
        .sum()
}

fn accepts_scalar(schema: &Schema, value: &Value) -> bool {
    if schema.const_value.is_some() || schema.enum_values.is_some() {
        return schema.matches_discriminant(value);
    }
    if value.is_null() && schema.nullable {
        return true;
    }
    match (&schema.shape, value) {
        (Shape::Leaf(kind), _) => kind.accepts(value),
        (Shape::Array(_), Value::Array(_)) => true,
        (Shape::Union(variants), _) => variants.iter().any(|v| accepts_scalar(v, value)),
        _ => false,
    }
}
