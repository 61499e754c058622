//! Configuration for template production and healing.

use serde::{Deserialize, Serialize};

/// What to do when a property already has a `//` comment above it whose
/// text differs from the schema description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMode {
    /// Rewrite the comment so it matches the current description (default).
    #[default]
    Refresh,
    /// Leave the existing comment as the user wrote it.
    Keep,
}

/// Options for [`crate::template`] and [`crate::heal`].
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` so the options can be embedded in a
/// host application's own config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Options {
    /// Policy for comments that disagree with the schema description.
    pub comments: CommentMode,
}

impl Options {
    /// Options that never overwrite a comment the user edited.
    pub fn keep_comments() -> Self {
        Self {
            comments: CommentMode::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_serde_round_trip() {
        let opts = Options::keep_comments();

        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"comments":"keep"}"#);

        let deserialized: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, opts);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let opts: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.comments, CommentMode::Refresh);
    }
}
