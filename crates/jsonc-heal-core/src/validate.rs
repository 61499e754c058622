//! Schema compliance checking.
//!
//! Optional properties set to `null` count as absent: the value is first
//! copied with those nulls removed (following the union branch each value
//! resolves to), and the copy is checked. The caller's value is untouched.
//!
//! Violations are data, reported with a JSON Pointer to the offending
//! instance location and a short message.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::Path;
use crate::resolver::{resolve_by_data, resolve_for_value};
use crate::schema::{Constraints, Schema, Shape};

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON Pointer (RFC 6901) to the instance location; `""` is the root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path={} message={}", self.path, self.message)
    }
}

/// Check `value` against `schema`. A non-object value is checked as `{}`.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Violation> {
    let empty = Value::Object(Map::new());
    let value = if value.is_object() { value } else { &empty };
    let root = resolve_by_data(schema, value);
    let stripped = strip_optional_nulls(root, value);

    let mut checker = Checker::default();
    let mut violations = Vec::new();
    checker.check(schema, &stripped, &Path::root(), &mut violations);
    violations
}

/// Copy of `value` without `null`s in optional properties.
pub fn strip_optional_nulls(schema: &Schema, value: &Value) -> Value {
    match (&schema.shape, value) {
        (Shape::Union(_), _) => {
            let chosen = resolve_for_value(schema, value);
            if std::ptr::eq(chosen, schema) {
                value.clone()
            } else {
                strip_optional_nulls(chosen, value)
            }
        }
        (Shape::Object(obj), Value::Object(map)) => {
            let mut out = Map::new();
            for (key, sub) in map {
                match obj.properties.get(key) {
                    Some(_) if sub.is_null() && !obj.required.contains(key) => {}
                    Some(prop) => {
                        out.insert(key.clone(), strip_optional_nulls(prop, sub));
                    }
                    None => {
                        out.insert(key.clone(), sub.clone());
                    }
                }
            }
            Value::Object(out)
        }
        (Shape::Array(items), Value::Array(elements)) => Value::Array(
            elements
                .iter()
                .map(|element| strip_optional_nulls(items, element))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[derive(Default)]
struct Checker {
    /// Compiled patterns; a failed compilation is cached as its message.
    regex_cache: HashMap<String, Result<Regex, String>>,
}

fn violation(out: &mut Vec<Violation>, path: &Path, message: impl Into<String>) {
    out.push(Violation {
        path: path.to_pointer(),
        message: message.into(),
    });
}

impl Checker {
    fn check(&mut self, schema: &Schema, value: &Value, path: &Path, out: &mut Vec<Violation>) {
        if value.is_null() && schema.nullable {
            return;
        }

        if let Some(expected) = &schema.const_value {
            if value != expected {
                violation(out, path, format!("Expected {expected}"));
                return;
            }
        }
        if let Some(allowed) = &schema.enum_values {
            if !allowed.contains(value) {
                let listed = allowed
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                violation(out, path, format!("Expected one of {listed}"));
                return;
            }
        }

        match &schema.shape {
            Shape::Union(variants) => self.check_union(schema, variants, value, path, out),
            Shape::Object(obj) => {
                let Value::Object(map) = value else {
                    violation(out, path, "Expected object");
                    return;
                };
                for key in &obj.required {
                    if !map.contains_key(key) {
                        violation(out, &path.child(key), "Expected required property");
                    }
                }
                for (key, sub) in map {
                    match obj.properties.get(key) {
                        Some(prop) => self.check(prop, sub, &path.child(key), out),
                        None if !obj.additional_properties => {
                            violation(out, &path.child(key), "Unexpected property")
                        }
                        None => {}
                    }
                }
            }
            Shape::Array(items) => {
                let Value::Array(elements) = value else {
                    violation(out, path, "Expected array");
                    return;
                };
                check_item_count(&schema.constraints, elements.len(), path, out);
                for (index, element) in elements.iter().enumerate() {
                    self.check(items, element, &path.index(index), out);
                }
            }
            Shape::Leaf(kind) => {
                if !kind.accepts(value) {
                    violation(out, path, format!("Expected {}", kind.name()));
                    return;
                }
                match value {
                    Value::String(text) => self.check_string(&schema.constraints, text, path, out),
                    Value::Number(n) => {
                        if let Some(n) = n.as_f64() {
                            check_number(&schema.constraints, n, path, out);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn check_union(
        &mut self,
        schema: &Schema,
        variants: &[Schema],
        value: &Value,
        path: &Path,
        out: &mut Vec<Violation>,
    ) {
        if variants.is_empty() {
            return;
        }
        for variant in variants {
            let mut scratch = Vec::new();
            self.check(variant, value, path, &mut scratch);
            if scratch.is_empty() {
                return;
            }
        }
        let chosen = resolve_for_value(schema, value);
        tracing::debug!(path = %path, "no union branch validates, reporting the closest");
        self.check(chosen, value, path, out);
    }

    fn check_string(&mut self, constraints: &Constraints, text: &str, path: &Path, out: &mut Vec<Violation>) {
        let length = text.chars().count();
        if let Some(min) = constraints.min_length {
            if length < min {
                violation(out, path, format!("Expected string length greater or equal to {min}"));
            }
        }
        if let Some(max) = constraints.max_length {
            if length > max {
                violation(out, path, format!("Expected string length less or equal to {max}"));
            }
        }
        if let Some(pattern) = &constraints.pattern {
            let compiled = self
                .regex_cache
                .entry(pattern.clone())
                .or_insert_with(|| Regex::new(pattern).map_err(|e| e.to_string()));
            match compiled {
                Ok(re) if !re.is_match(text) => {
                    violation(out, path, format!("Expected string to match '{pattern}'"))
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(pattern = %pattern, error = %err, "pattern cannot be compiled");
                    violation(out, path, format!("Pattern '{pattern}' cannot be evaluated: {err}"))
                }
            }
        }
    }
}

fn check_number(constraints: &Constraints, n: f64, path: &Path, out: &mut Vec<Violation>) {
    if let Some(min) = constraints.minimum {
        if n < min {
            violation(out, path, format!("Expected number to be greater or equal to {min}"));
        }
    }
    if let Some(max) = constraints.maximum {
        if n > max {
            violation(out, path, format!("Expected number to be less or equal to {max}"));
        }
    }
    if let Some(min) = constraints.exclusive_minimum {
        if n <= min {
            violation(out, path, format!("Expected number to be greater than {min}"));
        }
    }
    if let Some(max) = constraints.exclusive_maximum {
        if n >= max {
            violation(out, path, format!("Expected number to be less than {max}"));
        }
    }
    if let Some(step) = constraints.multiple_of {
        if step > 0.0 {
            let quotient = n / step;
            if (quotient - quotient.round()).abs() > 1e-9 * quotient.abs().max(1.0) {
                violation(out, path, format!("Expected number to be a multiple of {step}"));
            }
        }
    }
}

fn check_item_count(constraints: &Constraints, len: usize, path: &Path, out: &mut Vec<Violation>) {
    if let Some(min) = constraints.min_items {
        if len < min {
            violation(out, path, format!("Expected array length to be greater or equal to {min}"));
        }
    }
    if let Some(max) = constraints.max_items {
        if len > max {
            violation(out, path, format!("Expected array length to be less or equal to {max}"));
        }
    }
}
