//! Schema model: a closed tree of Object, Array, Union and Leaf nodes.
//!
//! A [`Schema`] is built in code through the builder methods or loaded from
//! a JSON Schema document with [`Schema::from_json_schema`]. The tree is
//! owned, so it is acyclic by construction; `$ref` targets are inlined at
//! load time and a reference cycle is rejected.
//!
//! Every node may carry annotations shared by all shapes: `default`,
//! `const`, `enum`, `description`, a nullable flag and validation
//! [`Constraints`].

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::path::build_path;

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub shape: Shape,
    pub default: Option<Value>,
    pub const_value: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub description: Option<String>,
    /// `null` is accepted in addition to the shape's own values.
    pub nullable: bool,
    pub constraints: Constraints,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Object(ObjectShape),
    Array(Box<Schema>),
    /// Branches in declaration order; the first is the fallback.
    Union(Vec<Schema>),
    Leaf(LeafKind),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    pub properties: IndexMap<String, Schema>,
    pub required: IndexSet<String>,
    pub additional_properties: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Any,
}

impl LeafKind {
    /// The narrowest kind describing `value`.
    pub fn of(value: &Value) -> LeafKind {
        match value {
            Value::String(_) => LeafKind::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => LeafKind::Integer,
            Value::Number(_) => LeafKind::Number,
            Value::Bool(_) => LeafKind::Boolean,
            Value::Null => LeafKind::Null,
            Value::Array(_) | Value::Object(_) => LeafKind::Any,
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            LeafKind::String => value.is_string(),
            LeafKind::Number => value.is_number(),
            LeafKind::Integer => is_integer(value),
            LeafKind::Boolean => value.is_boolean(),
            LeafKind::Null => value.is_null(),
            LeafKind::Any => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LeafKind::String => "string",
            LeafKind::Number => "number",
            LeafKind::Integer => "integer",
            LeafKind::Boolean => "boolean",
            LeafKind::Null => "null",
            LeafKind::Any => "any",
        }
    }
}

/// Integral numbers, including floats with no fractional part.
pub(crate) fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// Validation-only keywords.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
    pub pattern: Option<String>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl Schema {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            default: None,
            const_value: None,
            enum_values: None,
            description: None,
            nullable: false,
            constraints: Constraints::default(),
        }
    }

    pub fn string() -> Self {
        Self::new(Shape::Leaf(LeafKind::String))
    }

    pub fn number() -> Self {
        Self::new(Shape::Leaf(LeafKind::Number))
    }

    pub fn integer() -> Self {
        Self::new(Shape::Leaf(LeafKind::Integer))
    }

    pub fn boolean() -> Self {
        Self::new(Shape::Leaf(LeafKind::Boolean))
    }

    pub fn null() -> Self {
        Self::new(Shape::Leaf(LeafKind::Null))
    }

    pub fn any() -> Self {
        Self::new(Shape::Leaf(LeafKind::Any))
    }

    pub fn array(items: Schema) -> Self {
        Self::new(Shape::Array(Box::new(items)))
    }

    pub fn union(variants: Vec<Schema>) -> Self {
        Self::new(Shape::Union(variants))
    }

    pub fn object() -> ObjectBuilder {
        ObjectBuilder {
            shape: ObjectShape {
                additional_properties: true,
                ..ObjectShape::default()
            },
        }
    }

    /// A leaf whose only valid value is `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        let value = value.into();
        let mut schema = Self::new(Shape::Leaf(LeafKind::of(&value)));
        schema.const_value = Some(value);
        schema
    }

    /// A leaf restricted to `values`.
    ///
    /// # Example
    /// ```
    /// use jsonc_heal_core::Schema;
    /// let mode = Schema::enumeration(["REWRITE", "APPEND"]).with_default("REWRITE");
    /// assert_eq!(mode.enum_values.as_ref().map(Vec::len), Some(2));
    /// ```
    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let kind = match values.first().map(LeafKind::of) {
            Some(first) if values.iter().all(|v| LeafKind::of(v) == first) => first,
            _ => LeafKind::Any,
        };
        let mut schema = Self::new(Shape::Leaf(kind));
        schema.enum_values = Some(values);
        schema
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self
    }

    pub fn minimum(mut self, n: f64) -> Self {
        self.constraints.minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: f64) -> Self {
        self.constraints.maximum = Some(n);
        self
    }

    pub fn exclusive_minimum(mut self, n: f64) -> Self {
        self.constraints.exclusive_minimum = Some(n);
        self
    }

    pub fn exclusive_maximum(mut self, n: f64) -> Self {
        self.constraints.exclusive_maximum = Some(n);
        self
    }

    pub fn multiple_of(mut self, n: f64) -> Self {
        self.constraints.multiple_of = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.constraints.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.constraints.max_items = Some(n);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match &self.shape {
            Shape::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&Schema> {
        match &self.shape {
            Shape::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn variants(&self) -> Option<&[Schema]> {
        match &self.shape {
            Shape::Union(variants) => Some(variants),
            _ => None,
        }
    }

    /// Whether `value` equals this node's `const` or is one of its `enum`
    /// values.
    pub fn matches_discriminant(&self, value: &Value) -> bool {
        self.const_value.as_ref() == Some(value)
            || self
                .enum_values
                .as_ref()
                .is_some_and(|values| values.contains(value))
    }
}

/// Builder returned by [`Schema::object`].
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    shape: ObjectShape,
}

impl ObjectBuilder {
    /// Add a required property.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.shape.required.insert(name.clone());
        self.shape.properties.insert(name, schema);
        self
    }

    /// Add a property that may be absent (or `null`).
    pub fn optional(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.shape.required.shift_remove(&name);
        self.shape.properties.insert(name, schema);
        self
    }

    /// Reject keys not declared as properties.
    pub fn deny_additional(mut self) -> Self {
        self.shape.additional_properties = false;
        self
    }

    pub fn build(self) -> Schema {
        Schema::new(Shape::Object(self.shape))
    }
}

// ---------------------------------------------------------------------------
// JSON Schema loading
// ---------------------------------------------------------------------------

impl Schema {
    /// Load the supported JSON Schema subset.
    ///
    /// `$ref` must point into the same document (`#/$defs/...` or
    /// `#/definitions/...`); sibling `description` and `default` override the
    /// referenced definition. `allOf` and tuple `items` are rejected.
    pub fn from_json_schema(document: &Value) -> Result<Schema, SchemaError> {
        let mut loader = Loader {
            root: document,
            visiting: HashSet::new(),
        };
        loader.load(document, "#")
    }
}

struct Loader<'a> {
    root: &'a Value,
    visiting: HashSet<String>,
}

impl<'a> Loader<'a> {
    fn load(&mut self, node: &'a Value, path: &str) -> Result<Schema, SchemaError> {
        let obj = match node {
            Value::Object(obj) => obj,
            Value::Bool(true) => return Ok(Schema::any()),
            Value::Bool(false) => {
                return Err(SchemaError::UnsupportedFeature {
                    path: path.to_string(),
                    feature: "false schema".to_string(),
                })
            }
            _ => return Err(invalid(path, "schema must be an object or a boolean")),
        };

        if let Some(reference) = obj.get("$ref") {
            return self.load_ref(obj, reference, path);
        }
        if obj.contains_key("allOf") {
            return Err(SchemaError::UnsupportedFeature {
                path: path.to_string(),
                feature: "allOf".to_string(),
            });
        }

        let mut schema = if let Some(variants) = obj.get("anyOf").or_else(|| obj.get("oneOf")) {
            Schema::new(self.load_union(variants, path)?)
        } else {
            let mut nullable = false;
            let shape = match obj.get("type") {
                Some(Value::String(name)) => self.load_shape(obj, name, path)?,
                Some(Value::Array(names)) => {
                    let mut kept = Vec::new();
                    for name in names {
                        match name.as_str() {
                            Some("null") => nullable = true,
                            Some(name) => kept.push(name),
                            None => return Err(invalid(path, "type entries must be strings")),
                        }
                    }
                    match kept.as_slice() {
                        [] => Shape::Leaf(LeafKind::Null),
                        [single] => self.load_shape(obj, single, path)?,
                        many => {
                            let variants = many
                                .iter()
                                .map(|name| self.load_shape(obj, name, path).map(Schema::new))
                                .collect::<Result<Vec<_>, _>>()?;
                            Shape::Union(variants)
                        }
                    }
                }
                Some(_) => return Err(invalid(path, "type must be a string or an array")),
                None => self.infer_shape(obj, path)?,
            };
            let mut schema = Schema::new(shape);
            schema.nullable = nullable;
            schema
        };

        load_annotations(&mut schema, obj, path)?;
        schema.constraints = load_constraints(obj, path)?;
        Ok(schema)
    }

    fn load_ref(
        &mut self,
        obj: &'a Map<String, Value>,
        reference: &Value,
        path: &str,
    ) -> Result<Schema, SchemaError> {
        let reference = reference
            .as_str()
            .ok_or_else(|| invalid(path, "$ref must be a string"))?;
        if !reference.starts_with("#/$defs/") && !reference.starts_with("#/definitions/") {
            return Err(SchemaError::UnsupportedFeature {
                path: path.to_string(),
                feature: format!("$ref outside #/$defs or #/definitions: {reference}"),
            });
        }
        if self.visiting.contains(reference) {
            return Err(SchemaError::RecursiveRef {
                path: path.to_string(),
                reference: reference.to_string(),
            });
        }
        let target = self
            .root
            .pointer(&reference[1..])
            .ok_or_else(|| SchemaError::UnresolvableRef {
                path: path.to_string(),
                reference: reference.to_string(),
            })?;

        self.visiting.insert(reference.to_string());
        let resolved = self.load(target, reference);
        self.visiting.remove(reference);
        let mut schema = resolved?;

        // Site-specific annotations override the definition.
        if let Some(description) = obj.get("description").and_then(Value::as_str) {
            schema.description = Some(description.to_string());
        }
        if let Some(default) = obj.get("default") {
            schema.default = Some(default.clone());
        }
        Ok(schema)
    }

    fn load_union(&mut self, variants: &'a Value, path: &str) -> Result<Shape, SchemaError> {
        let variants = variants
            .as_array()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| invalid(path, "anyOf/oneOf must be a non-empty array"))?;
        let loaded = variants
            .iter()
            .enumerate()
            .map(|(i, v)| self.load(v, &build_path(path, &["anyOf", &i.to_string()])))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Shape::Union(loaded))
    }

    fn load_shape(
        &mut self,
        obj: &'a Map<String, Value>,
        type_name: &str,
        path: &str,
    ) -> Result<Shape, SchemaError> {
        Ok(match type_name {
            "object" => Shape::Object(self.load_object(obj, path)?),
            "array" => {
                let items = match obj.get("items") {
                    None => Schema::any(),
                    Some(Value::Array(_)) => {
                        return Err(SchemaError::UnsupportedFeature {
                            path: build_path(path, &["items"]),
                            feature: "tuple items".to_string(),
                        })
                    }
                    Some(items) => self.load(items, &build_path(path, &["items"]))?,
                };
                Shape::Array(Box::new(items))
            }
            "string" => Shape::Leaf(LeafKind::String),
            "number" => Shape::Leaf(LeafKind::Number),
            "integer" => Shape::Leaf(LeafKind::Integer),
            "boolean" => Shape::Leaf(LeafKind::Boolean),
            "null" => Shape::Leaf(LeafKind::Null),
            other => return Err(invalid(path, &format!("unknown type {other:?}"))),
        })
    }

    fn infer_shape(&mut self, obj: &'a Map<String, Value>, path: &str) -> Result<Shape, SchemaError> {
        if obj.contains_key("properties") {
            return self.load_shape(obj, "object", path);
        }
        if obj.contains_key("items") {
            return self.load_shape(obj, "array", path);
        }
        let kind = match (obj.get("const"), obj.get("enum")) {
            (Some(value), _) => LeafKind::of(value),
            (None, Some(Value::Array(values))) => match values.first().map(LeafKind::of) {
                Some(first) if values.iter().all(|v| LeafKind::of(v) == first) => first,
                _ => LeafKind::Any,
            },
            _ => LeafKind::Any,
        };
        Ok(Shape::Leaf(kind))
    }

    fn load_object(&mut self, obj: &'a Map<String, Value>, path: &str) -> Result<ObjectShape, SchemaError> {
        let mut shape = ObjectShape {
            additional_properties: true,
            ..ObjectShape::default()
        };

        if let Some(properties) = obj.get("properties") {
            let properties = properties
                .as_object()
                .ok_or_else(|| invalid(path, "properties must be an object"))?;
            for (name, prop) in properties {
                let prop_path = build_path(path, &["properties", name]);
                shape.properties.insert(name.clone(), self.load(prop, &prop_path)?);
            }
        }

        if let Some(required) = obj.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| invalid(path, "required must be an array"))?;
            for name in required {
                let name = name
                    .as_str()
                    .ok_or_else(|| invalid(path, "required entries must be strings"))?;
                shape.required.insert(name.to_string());
            }
        }

        match obj.get("additionalProperties") {
            None | Some(Value::Object(_)) => {}
            Some(Value::Bool(allowed)) => shape.additional_properties = *allowed,
            Some(_) => return Err(invalid(path, "additionalProperties must be a boolean or a schema")),
        }

        Ok(shape)
    }
}

fn invalid(path: &str, message: &str) -> SchemaError {
    SchemaError::InvalidKeyword {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn load_annotations(schema: &mut Schema, obj: &Map<String, Value>, path: &str) -> Result<(), SchemaError> {
    schema.default = obj.get("default").cloned();
    schema.const_value = obj.get("const").cloned();
    schema.enum_values = match obj.get("enum") {
        None => None,
        Some(Value::Array(values)) => Some(values.clone()),
        Some(_) => return Err(invalid(path, "enum must be an array")),
    };
    schema.description = match obj.get("description") {
        None => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(invalid(path, "description must be a string")),
    };
    if schema.enum_values.as_ref().is_some_and(|v| v.contains(&Value::Null))
        || schema.const_value.as_ref().is_some_and(Value::is_null)
    {
        schema.nullable = true;
    }
    Ok(())
}

fn load_constraints(obj: &Map<String, Value>, path: &str) -> Result<Constraints, SchemaError> {
    let count = |key: &str| -> Result<Option<usize>, SchemaError> {
        match obj.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| invalid(path, &format!("{key} must be a non-negative integer"))),
        }
    };
    let number = |key: &str| -> Result<Option<f64>, SchemaError> {
        match obj.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid(path, &format!("{key} must be a number"))),
        }
    };

    let mut constraints = Constraints {
        min_length: count("minLength")?,
        max_length: count("maxLength")?,
        minimum: number("minimum")?,
        maximum: number("maximum")?,
        min_items: count("minItems")?,
        max_items: count("maxItems")?,
        multiple_of: number("multipleOf")?,
        ..Constraints::default()
    };

    // Draft 4 spells exclusive bounds as booleans modifying minimum/maximum.
    match obj.get("exclusiveMinimum") {
        Some(Value::Bool(true)) => constraints.exclusive_minimum = constraints.minimum.take(),
        Some(Value::Bool(false)) | None => {}
        Some(_) => constraints.exclusive_minimum = number("exclusiveMinimum")?,
    }
    match obj.get("exclusiveMaximum") {
        Some(Value::Bool(true)) => constraints.exclusive_maximum = constraints.maximum.take(),
        Some(Value::Bool(false)) | None => {}
        Some(_) => constraints.exclusive_maximum = number("exclusiveMaximum")?,
    }

    if let Some(pattern) = obj.get("pattern") {
        let pattern = pattern
            .as_str()
            .ok_or_else(|| invalid(path, "pattern must be a string"))?;
        if let Err(e) = regex::Regex::new(pattern) {
            return Err(invalid(path, &format!("invalid pattern: {e}")));
        }
        constraints.pattern = Some(pattern.to_string());
    }

    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn load(doc: Value) -> Schema {
        Schema::from_json_schema(&doc).unwrap()
    }

    fn load_err(doc: Value) -> SchemaError {
        Schema::from_json_schema(&doc).unwrap_err()
    }

    #[test]
    fn test_builder_required_and_optional() {
        let schema = Schema::object()
            .property("a", Schema::string())
            .optional("b", Schema::number())
            .build();
        let obj = schema.as_object().unwrap();
        assert_eq!(obj.properties.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(obj.required.contains("a"));
        assert!(!obj.required.contains("b"));
        assert!(obj.additional_properties);
    }

    #[test]
    fn test_literal_infers_kind() {
        let schema = Schema::literal("oracle");
        assert_eq!(schema.shape, Shape::Leaf(LeafKind::String));
        assert!(schema.matches_discriminant(&json!("oracle")));
        assert!(!schema.matches_discriminant(&json!("mssql")));
    }

    #[test]
    fn test_load_object_with_properties() {
        let schema = load(json!({
            "type": "object",
            "properties": {
                "dir": { "type": "string", "default": "path/to/log", "description": "log dir" },
                "count": { "type": "integer", "minimum": 0 }
            },
            "required": ["dir"],
            "additionalProperties": false
        }));
        let obj = schema.as_object().unwrap();
        assert!(!obj.additional_properties);
        assert_eq!(obj.required.len(), 1);
        let dir = &obj.properties["dir"];
        assert_eq!(dir.default, Some(json!("path/to/log")));
        assert_eq!(dir.description.as_deref(), Some("log dir"));
        assert_eq!(obj.properties["count"].constraints.minimum, Some(0.0));
    }

    #[test]
    fn test_load_any_of_as_union() {
        let schema = load(json!({
            "anyOf": [
                { "type": "object", "properties": { "kind": { "const": "a" } } },
                { "type": "object", "properties": { "kind": { "const": "b" } } }
            ]
        }));
        assert_eq!(schema.variants().map(<[Schema]>::len), Some(2));
    }

    #[test]
    fn test_one_of_keeps_own_annotations() {
        let schema = load(json!({
            "description": "storage backend",
            "oneOf": [{ "type": "string" }, { "type": "integer" }]
        }));
        assert_eq!(schema.description.as_deref(), Some("storage backend"));
        assert_eq!(schema.variants().map(<[Schema]>::len), Some(2));
    }

    #[test]
    fn test_nullable_type_array() {
        let schema = load(json!({ "type": ["string", "null"] }));
        assert_eq!(schema.shape, Shape::Leaf(LeafKind::String));
        assert!(schema.nullable);
    }

    #[test]
    fn test_multiple_types_become_union() {
        let schema = load(json!({ "type": ["string", "integer"] }));
        let variants = schema.variants().unwrap();
        assert_eq!(variants[1].shape, Shape::Leaf(LeafKind::Integer));
    }

    #[test]
    fn test_ref_is_inlined_with_sibling_override() {
        let schema = load(json!({
            "type": "object",
            "properties": {
                "log": { "$ref": "#/$defs/Log", "description": "logging" }
            },
            "$defs": {
                "Log": {
                    "type": "object",
                    "description": "original",
                    "properties": { "dir": { "type": "string" } }
                }
            }
        }));
        let log = &schema.as_object().unwrap().properties["log"];
        assert_eq!(log.description.as_deref(), Some("logging"));
        assert!(log.as_object().unwrap().properties.contains_key("dir"));
    }

    #[test]
    fn test_legacy_definitions_ref() {
        let schema = load(json!({
            "properties": { "a": { "$ref": "#/definitions/A" } },
            "definitions": { "A": { "type": "boolean", "default": true } }
        }));
        assert_eq!(schema.as_object().unwrap().properties["a"].default, Some(json!(true)));
    }

    #[test]
    fn test_recursive_ref_rejected() {
        let err = load_err(json!({
            "properties": { "node": { "$ref": "#/$defs/Node" } },
            "$defs": {
                "Node": { "type": "object", "properties": { "next": { "$ref": "#/$defs/Node" } } }
            }
        }));
        assert!(matches!(err, SchemaError::RecursiveRef { .. }));
    }

    #[test]
    fn test_unresolvable_ref() {
        let err = load_err(json!({ "properties": { "a": { "$ref": "#/$defs/Missing" } } }));
        match err {
            SchemaError::UnresolvableRef { path, reference } => {
                assert_eq!(path, "#/properties/a");
                assert_eq!(reference, "#/$defs/Missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_of_unsupported() {
        let err = load_err(json!({ "allOf": [{ "type": "string" }] }));
        assert!(matches!(err, SchemaError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_empty_any_of_rejected() {
        assert!(matches!(
            load_err(json!({ "anyOf": [] })),
            SchemaError::InvalidKeyword { .. }
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(matches!(
            load_err(json!({ "type": "string", "pattern": "(" })),
            SchemaError::InvalidKeyword { .. }
        ));
    }

    #[test]
    fn test_draft4_exclusive_bounds() {
        let schema = load(json!({ "type": "number", "minimum": 1, "exclusiveMinimum": true }));
        assert_eq!(schema.constraints.minimum, None);
        assert_eq!(schema.constraints.exclusive_minimum, Some(1.0));
    }

    #[test]
    fn test_enum_infers_leaf_kind() {
        let schema = load(json!({ "enum": ["INCLUDE", "EXCEPT"], "default": "INCLUDE" }));
        assert_eq!(schema.shape, Shape::Leaf(LeafKind::String));
        assert!(schema.matches_discriminant(&json!("EXCEPT")));
    }
}
