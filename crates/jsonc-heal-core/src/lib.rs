//! Schema-driven JSONC configuration templating and healing.
//!
//! Two entry points:
//!
//! * [`template`] produces a fresh, commented JSONC document from a schema,
//!   optionally steered towards particular union branches by
//!   [`VariantHint`]s.
//! * [`heal`] takes an existing JSONC document, adds whatever the schema
//!   says is missing without touching what the user wrote, refreshes the
//!   description comments, reformats, and reports schema violations.
//!
//! Neither operation fails. Text that does not parse is replaced by the
//! empty object (with a `tracing` warning) and healed from there, so the
//! returned text always parses.
//!
//! ```
//! use jsonc_heal_core::{heal, Options, Schema};
//!
//! let schema = Schema::object()
//!     .property("port", Schema::integer().with_default(8080).describe("listen port"))
//!     .build();
//!
//! let healed = heal(&schema, "{}", &Options::default());
//! assert!(healed.changed);
//! assert!(healed.errors.is_empty());
//! assert_eq!(healed.text, "{\n    // listen port\n    \"port\": 8080\n}\n");
//! ```

pub mod comments;
pub mod config;
pub mod error;
pub mod jsonc;
pub mod merge;
pub mod missing;
pub mod path;
pub mod resolver;
pub mod schema;
pub mod skeleton;
pub mod validate;
pub mod walker;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use config::{CommentMode, Options};
pub use error::{EditError, ParseError, ParseErrorKind, SchemaError};
pub use merge::{Document, EditOp};
pub use missing::MissingEntry;
pub use path::{Path, Segment, VariantHint};
pub use schema::{Constraints, LeafKind, ObjectBuilder, ObjectShape, Schema, Shape};
pub use skeleton::{CommentMap, Skeleton};
pub use validate::Violation;

/// A freshly produced document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub text: String,
    pub value: Value,
}

/// The outcome of healing a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Healed {
    /// The parsed healed document.
    pub value: Value,
    /// Schema violations left after healing.
    pub errors: Vec<Violation>,
    /// Whether any property was added. Comment and layout edits do not count.
    pub changed: bool,
    pub text: String,
}

/// Produce the template document for `schema`.
///
/// A root union is resolved by `hints`; nested unions see the hints rebased
/// to their own location. Unmatched hints fall back to the first branch.
pub fn template(schema: &Schema, hints: &[VariantHint], options: &Options) -> Template {
    let root = resolver::resolve_by_hints(schema, hints);
    let skeleton = skeleton::build(root, &Path::root(), hints, None);

    let value = skeleton.value.unwrap_or_else(|| Value::Object(Map::new()));
    let text = jsonc::to_text(&value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "template value does not serialize, starting from an empty document");
        "{}\n".to_string()
    });

    let document = Document::parse(&text);
    let (document, _) = merge::apply_all(
        document,
        comments::sync_ops(&skeleton.comments, options.comments),
    );
    let (document, _) = document.apply(&EditOp::Format);

    let (text, value) = document.into_parts();
    Template { text, value }
}

/// Heal `text` against `schema`.
pub fn heal(schema: &Schema, text: &str, options: &Options) -> Healed {
    let document = Document::parse(text);

    let root = resolver::resolve_by_data(schema, document.value());
    let skeleton = skeleton::build(root, &Path::root(), &[], Some(document.value()));

    let mut entries = skeleton
        .value
        .as_ref()
        .map(|expected| missing::diff(document.value(), expected))
        .unwrap_or_default();
    missing::empty_arrays(&mut entries, root, &Path::root());
    tracing::debug!(missing = entries.len(), "collected missing properties");

    let (document, added) = merge::apply_missing(document, entries);
    let (document, added_items) = merge::heal_array_items(schema, document);
    let (document, _) = document.apply(&EditOp::Format);

    let (document, _) = merge::apply_all(
        document,
        comments::sync_ops(&skeleton.comments, options.comments),
    );
    let strip = comments::strip_ops(schema, document.value());
    let (document, _) = merge::apply_all(document, strip);
    let (document, _) = document.apply(&EditOp::Format);

    let errors = validate::validate(schema, document.value());
    for violation in &errors {
        tracing::debug!(%violation, "schema violation");
    }

    let (text, value) = document.into_parts();
    Healed {
        value,
        errors,
        changed: added || added_items,
        text,
    }
}
