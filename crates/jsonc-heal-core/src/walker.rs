//! Schema-guided data walker for arrays of objects.
//!
//! Traverses a value alongside its schema, following object properties,
//! resolved union branches and array items, and reports every array element
//! whose item schema is an object.

use serde_json::Value;

use crate::path::Path;
use crate::resolver::resolve_for_value;
use crate::schema::{Schema, Shape};

/// Call `visit(item_schema, element_path, element)` for every map element of
/// every array whose items resolve to an object schema, outermost first.
/// Elements are visited in index order and nested arrays inside an element
/// are walked after the element itself.
pub fn visit_object_array_items<F>(schema: &Schema, value: &Value, visit: &mut F)
where
    F: FnMut(&Schema, &Path, &Value),
{
    walk(schema, value, &Path::root(), visit);
}

fn walk<F>(schema: &Schema, value: &Value, path: &Path, visit: &mut F)
where
    F: FnMut(&Schema, &Path, &Value),
{
    match &schema.shape {
        Shape::Union(_) => {
            let chosen = resolve_for_value(schema, value);
            if !std::ptr::eq(chosen, schema) {
                walk(chosen, value, path, visit);
            }
        }
        Shape::Object(obj) => {
            let Value::Object(map) = value else {
                return;
            };
            for (key, prop) in &obj.properties {
                if let Some(sub) = map.get(key) {
                    walk(prop, sub, &path.child(key), visit);
                }
            }
        }
        Shape::Array(items) => {
            let Value::Array(elements) = value else {
                return;
            };
            for (index, element) in elements.iter().enumerate() {
                let item = resolve_for_value(items, element);
                let element_path = path.index(index);
                if item.as_object().is_some() && element.is_object() {
                    tracing::trace!(path = %element_path, "visiting array element");
                    visit(item, &element_path, element);
                }
                walk(item, element, &element_path, visit);
            }
        }
        Shape::Leaf(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn visited(schema: &Schema, value: &Value) -> Vec<String> {
        let mut paths = Vec::new();
        visit_object_array_items(schema, value, &mut |_, path, _| paths.push(path.to_string()));
        paths
    }

    fn item() -> Schema {
        Schema::object()
            .property("name", Schema::string())
            .property(
                "children",
                Schema::array(Schema::object().property("id", Schema::integer()).build()),
            )
            .build()
    }

    #[test]
    fn test_visits_every_element_and_nested_arrays() {
        let schema = Schema::object().property("list", Schema::array(item())).build();
        let value = json!({
            "list": [
                { "name": "a", "children": [{ "id": 1 }, { "id": 2 }] },
                "not an object",
                { "name": "b" }
            ]
        });
        assert_eq!(
            visited(&schema, &value),
            vec!["list.0", "list.0.children.0", "list.0.children.1", "list.2"]
        );
    }

    #[test]
    fn test_walks_through_resolved_union() {
        let schema = Schema::object()
            .property(
                "db",
                Schema::union(vec![
                    Schema::object().property("kind", Schema::literal("a")).build(),
                    Schema::object()
                        .property("kind", Schema::literal("b"))
                        .property("tables", Schema::array(item()))
                        .build(),
                ]),
            )
            .build();
        let value = json!({ "db": { "kind": "b", "tables": [{ "name": "t" }] } });
        assert_eq!(visited(&schema, &value), vec!["db.tables.0"]);
    }

    #[test]
    fn test_scalar_arrays_are_ignored() {
        let schema = Schema::object()
            .property("tags", Schema::array(Schema::string()))
            .build();
        assert!(visited(&schema, &json!({ "tags": ["x", "y"] })).is_empty());
    }
}
