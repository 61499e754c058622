//! Offset-bearing syntax tree for JSONC documents.
//!
//! Comments are skipped by the parser; trailing commas in objects and
//! arrays are accepted. Every node records the byte span it occupies so
//! edits can be addressed against the exact source text.

use serde_json::{Map, Value};

use super::scanner::{decode_number, decode_string, tokenize, Token, TokenKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::path::{Path, Segment};

/// Maximum container nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `trailing_comma` is the offset of a comma after the last member.
    Object { trailing_comma: Option<usize> },
    Array { trailing_comma: Option<usize> },
    /// A `"key": value` member; its single child is the value.
    Property(String),
    Scalar(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object { .. })
    }

    /// The property member named `key`. With duplicate keys the last one
    /// wins, matching [`Node::to_value`].
    pub fn property(&self, key: &str) -> Option<&Node> {
        if !self.is_object() {
            return None;
        }
        self.children
            .iter()
            .rev()
            .find(|child| matches!(&child.kind, NodeKind::Property(k) if k == key))
    }

    /// The value node of a property member.
    pub fn property_value(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::Property(_) => self.children.first(),
            _ => None,
        }
    }

    /// Walk `path` from this node to a value node.
    pub fn find(&self, path: &Path) -> Option<&Node> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| match (segment, &node.kind) {
                (Segment::Key(key), NodeKind::Object { .. }) => {
                    node.property(key).and_then(Node::property_value)
                }
                (Segment::Index(i), NodeKind::Array { .. }) => node.children.get(*i),
                _ => None,
            })
    }

    /// The property member addressed by `path` (whose last segment is a key).
    pub fn find_property(&self, path: &Path) -> Option<&Node> {
        let (last, parent) = path.split_last()?;
        self.find(&parent)?.property(last.as_key()?)
    }

    pub fn to_value(&self) -> Value {
        match &self.kind {
            NodeKind::Object { .. } => {
                let mut map = Map::new();
                for child in &self.children {
                    if let (NodeKind::Property(key), Some(value)) =
                        (&child.kind, child.property_value())
                    {
                        map.insert(key.clone(), value.to_value());
                    }
                }
                Value::Object(map)
            }
            NodeKind::Array { .. } => {
                Value::Array(self.children.iter().map(Node::to_value).collect())
            }
            NodeKind::Property(_) => self
                .property_value()
                .map(Node::to_value)
                .unwrap_or(Value::Null),
            NodeKind::Scalar(value) => value.clone(),
        }
    }
}

/// Parse a complete document into a syntax tree.
pub fn parse_tree(text: &str) -> Result<Node, ParseError> {
    let tokens: Vec<Token> = tokenize(text)?
        .into_iter()
        .filter(|t| !t.is_comment())
        .collect();
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
        depth: 0,
    };
    let root = parser.parse_value()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(ParseError::new(ParseErrorKind::TrailingContent, extra.start));
    }
    Ok(root)
}

/// Parse a complete document into a value.
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    parse_tree(text).map(|root| root.to_value())
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEnd, self.text.len()))?;
        self.pos += 1;
        Ok(token)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn parse_value(&mut self) -> Result<Node, ParseError> {
        let token = self.next()?;
        let scalar = |value: Value| Node {
            kind: NodeKind::Scalar(value),
            span: Span {
                start: token.start,
                end: token.end,
            },
            children: Vec::new(),
        };
        match token.kind {
            TokenKind::OpenBrace => self.parse_container(token, true),
            TokenKind::OpenBracket => self.parse_container(token, false),
            TokenKind::String => Ok(scalar(Value::String(decode_string(
                token.text(self.text),
                token.start,
            )?))),
            TokenKind::Number => Ok(scalar(Value::Number(decode_number(
                token.text(self.text),
                token.start,
            )?))),
            TokenKind::True => Ok(scalar(Value::Bool(true))),
            TokenKind::False => Ok(scalar(Value::Bool(false))),
            TokenKind::Null => Ok(scalar(Value::Null)),
            _ => Err(ParseError::new(ParseErrorKind::ExpectedValue, token.start)),
        }
    }

    /// Parse an object (`is_object`) or array after its opening token.
    fn parse_container(&mut self, open: Token, is_object: bool) -> Result<Node, ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                open.start,
            ));
        }
        let close = if is_object {
            TokenKind::CloseBrace
        } else {
            TokenKind::CloseBracket
        };

        let mut children = Vec::new();
        let mut trailing_comma = None;
        let end = loop {
            if self.peek_kind() == Some(close) {
                break self.next()?.end;
            }

            let member = if is_object {
                self.parse_property()?
            } else {
                self.parse_value()?
            };
            children.push(member);

            trailing_comma = match self.peek_kind() {
                Some(TokenKind::Comma) => Some(self.next()?.start),
                _ => None,
            };
            if trailing_comma.is_none() && self.peek_kind() != Some(close) {
                let offset = self.tokens.get(self.pos).map_or(self.text.len(), |t| t.start);
                let kind = if self.pos >= self.tokens.len() {
                    ParseErrorKind::UnexpectedEnd
                } else {
                    ParseErrorKind::ExpectedCommaOrClose
                };
                return Err(ParseError::new(kind, offset));
            }
        };
        self.depth -= 1;

        let kind = if is_object {
            NodeKind::Object { trailing_comma }
        } else {
            NodeKind::Array { trailing_comma }
        };
        Ok(Node {
            kind,
            span: Span {
                start: open.start,
                end,
            },
            children,
        })
    }

    fn parse_property(&mut self) -> Result<Node, ParseError> {
        let key_token = self.next()?;
        if key_token.kind != TokenKind::String {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedPropertyName,
                key_token.start,
            ));
        }
        let key = decode_string(key_token.text(self.text), key_token.start)?;

        let colon = self.next()?;
        if colon.kind != TokenKind::Colon {
            return Err(ParseError::new(ParseErrorKind::ExpectedColon, colon.start));
        }

        let value = self.parse_value()?;
        Ok(Node {
            kind: NodeKind::Property(key),
            span: Span {
                start: key_token.start,
                end: value.span.end,
            },
            children: vec![value],
        })
    }
}
