//! Document paths, discriminant hints and JSON Pointer rendering.
//!
//! A [`Path`] addresses a node in a document value tree as a sequence of
//! property names and array indices. Two textual forms are supported:
//!
//! * dotted: `db.objects.0.dir`, where all-digit segments are indices;
//! * JSON Pointer (RFC 6901): `/db/objects/0/dir`, used when reporting
//!   validation violations.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl Segment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{i}"),
            Segment::Key(k) => f.write_str(k),
        }
    }
}

/// An ordered sequence of segments from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse dotted syntax. Segments made only of ASCII digits become
    /// array indices; an empty string is the root.
    ///
    /// # Example
    /// ```
    /// use jsonc_heal_core::{Path, Segment};
    /// let path = Path::parse("items.0.name");
    /// assert_eq!(path.segments()[1], Segment::Index(0));
    /// ```
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(
            dotted
                .split('.')
                .map(|seg| {
                    if !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()) {
                        seg.parse()
                            .map(Segment::Index)
                            .unwrap_or_else(|_| Segment::Key(seg.to_string()))
                    } else {
                        Segment::Key(seg.to_string())
                    }
                })
                .collect(),
        )
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// This path extended by a property name.
    pub fn child(&self, key: &str) -> Path {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Path(segments)
    }

    /// This path extended by an array index.
    pub fn index(&self, index: usize) -> Path {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Path(segments)
    }

    /// Concatenate `other` below this path.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Path(segments)
    }

    /// Split into the last segment and the parent path.
    pub fn split_last(&self) -> Option<(&Segment, Path)> {
        let (last, parent) = self.0.split_last()?;
        Some((last, Path(parent.to_vec())))
    }

    /// The remainder of this path below `first`, if this path starts with it.
    pub fn strip_first(&self, first: &Segment) -> Option<Path> {
        match self.0.split_first() {
            Some((head, rest)) if head == first => Some(Path(rest.to_vec())),
            _ => None,
        }
    }

    /// Render as an RFC 6901 JSON Pointer (`""` for the root).
    pub fn to_pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.0 {
            pointer.push('/');
            match segment {
                Segment::Index(i) => pointer.push_str(&i.to_string()),
                Segment::Key(k) => pointer.push_str(&escape_pointer_segment(k)),
            }
        }
        pointer
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self(segments)
    }
}

impl From<&str> for Path {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for Path {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

/// A caller-supplied discriminant used to pick a union branch before any
/// document exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantHint {
    pub path: Path,
    pub value: Value,
}

impl VariantHint {
    pub fn new(path: impl Into<Path>, value: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Hints addressed at or below property `key`, rebased relative to it.
    pub(crate) fn rebase(hints: &[VariantHint], key: &str) -> Vec<VariantHint> {
        let head = Segment::Key(key.to_string());
        hints
            .iter()
            .filter_map(|hint| {
                hint.path.strip_first(&head).map(|path| VariantHint {
                    path,
                    value: hint.value.clone(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use jsonc_heal_core::path::build_path;
/// assert_eq!(build_path("#", &["properties", "a/b"]), "#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}
