//! Error types for schema loading and JSONC text handling.
//!
//! None of these escape [`crate::template`] or [`crate::heal`]: both entry
//! points degrade instead of failing. They surface through the lower-level
//! APIs ([`crate::jsonc`], [`crate::Schema::from_json_schema`]).

use thiserror::Error;

/// Failure to load a [`crate::Schema`] from a JSON Schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema error at {path}: {message}")]
    InvalidKeyword { path: String, message: String },

    #[error("Unresolvable $ref at {path}: {reference}")]
    UnresolvableRef { path: String, reference: String },

    #[error("Recursive $ref at {path}: {reference}")]
    RecursiveRef { path: String, reference: String },

    #[error("Unsupported schema feature at {path}: {feature}")]
    UnsupportedFeature { path: String, feature: String },
}

/// A syntax error in JSONC text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the source text.
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid string literal")]
    InvalidString,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("expected a value")]
    ExpectedValue,
    #[error("expected a property name")]
    ExpectedPropertyName,
    #[error("expected ':'")]
    ExpectedColon,
    #[error("expected ',' or a closing bracket")]
    ExpectedCommaOrClose,
    #[error("unexpected content after the document")]
    TrailingContent,
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// A path-addressed edit that could not be placed.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("document does not parse: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot insert at the document root")]
    RootPath,

    #[error("no container at {path}")]
    MissingParent { path: String },

    #[error("{path} is not an object")]
    NotAnObject { path: String },

    #[error("value serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
