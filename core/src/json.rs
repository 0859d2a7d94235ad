//! Path-based reads and upserts on JSON documents.
//!
//! # Design
//! The public helpers follow the same fail-soft rule as the invoker: parse
//! errors and unresolvable paths are logged at `warn` and surface as `None`.
//! Upserts work on a copy and return the whole document re-serialized; the
//! input is never modified.
//!
//! Paths are a small JSONPath subset: an optional `$` root followed by
//! `.name`, `['name']` / `["name"]` and `[index]` segments. Inside quoted
//! keys a backslash escapes the next character (`['a\'b']`). Wildcards,
//! filters, slices and recursive descent are rejected.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::JsonPathError;

/// A single step in a `JsonPath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed path expression such as `$.data.attributes.code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, JsonPathError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(JsonPathError::Empty);
        }
        let segments = Parser::new(trimmed).segments()?;
        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn select<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |node, segment| match segment {
                Segment::Key(key) => node.as_object()?.get(key),
                Segment::Index(index) => node.as_array()?.get(*index),
            })
    }

    pub fn select_mut<'a>(&self, document: &'a mut Value) -> Option<&'a mut Value> {
        self.segments
            .iter()
            .try_fold(document, |node, segment| match segment {
                Segment::Key(key) => node.as_object_mut()?.get_mut(key),
                Segment::Index(index) => node.as_array_mut()?.get_mut(*index),
            })
    }

    /// Sets `key = value` on the object this path points at.
    pub fn put(&self, document: &mut Value, key: &str, value: Value) -> Result<(), JsonPathError> {
        let target = self
            .select_mut(document)
            .ok_or_else(|| JsonPathError::NotFound(self.raw.clone()))?;
        let object = target
            .as_object_mut()
            .ok_or_else(|| JsonPathError::NotAnObject(self.raw.clone()))?;
        object.insert(key.to_string(), value);
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = JsonPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

struct Parser<'a> {
    path: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            chars: path.char_indices().peekable(),
        }
    }

    fn segments(mut self) -> Result<Vec<Segment>, JsonPathError> {
        let mut segments = Vec::new();
        match self.chars.peek().map(|&(_, c)| c) {
            Some('$') => {
                self.chars.next();
            }
            // `data.x` is read as `$.data.x`.
            Some(_) => segments.push(Segment::Key(self.name()?)),
            None => return Err(JsonPathError::Empty),
        }

        while let Some((offset, c)) = self.chars.next() {
            match c {
                '.' => {
                    if self.chars.peek().is_some_and(|&(_, next)| next == '.') {
                        return Err(self.unsupported(".."));
                    }
                    segments.push(Segment::Key(self.name()?));
                }
                '[' => segments.push(self.bracket()?),
                found => {
                    return Err(JsonPathError::Unexpected {
                        path: self.path.to_string(),
                        offset,
                        found,
                    })
                }
            }
        }
        Ok(segments)
    }

    /// Dotted member name, up to the next `.` or `[`.
    fn name(&mut self) -> Result<String, JsonPathError> {
        let mut name = String::new();
        while let Some(&(offset, c)) = self.chars.peek() {
            match c {
                '.' | '[' => break,
                '*' | '?' | '@' | '(' | ')' => {
                    return Err(if c == '*' {
                        self.unsupported("*")
                    } else {
                        JsonPathError::Unexpected {
                            path: self.path.to_string(),
                            offset,
                            found: c,
                        }
                    })
                }
                _ => {
                    name.push(c);
                    self.chars.next();
                }
            }
        }
        if name.is_empty() {
            return Err(JsonPathError::Unterminated(self.path.to_string()));
        }
        Ok(name)
    }

    /// Contents of `[...]` after the opening bracket.
    fn bracket(&mut self) -> Result<Segment, JsonPathError> {
        let (_, first) = self
            .chars
            .next()
            .ok_or_else(|| JsonPathError::Unterminated(self.path.to_string()))?;
        let segment = match first {
            quote @ ('\'' | '"') => {
                let mut key = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, c)) if c == quote => break,
                        Some((_, '\\')) => match self.chars.next() {
                            Some((_, escaped)) => key.push(escaped),
                            None => {
                                return Err(JsonPathError::Unterminated(self.path.to_string()))
                            }
                        },
                        Some((_, c)) => key.push(c),
                        None => return Err(JsonPathError::Unterminated(self.path.to_string())),
                    }
                }
                Segment::Key(key)
            }
            digit if digit.is_ascii_digit() => {
                let mut index = String::from(digit);
                while let Some(&(_, c)) = self.chars.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    index.push(c);
                    self.chars.next();
                }
                let index = index
                    .parse::<usize>()
                    .map_err(|_| self.unsupported(&format!("[{index}]")))?;
                Segment::Index(index)
            }
            '*' => return Err(self.unsupported("[*]")),
            '?' => return Err(self.unsupported("[?()]")),
            '-' | ':' => return Err(self.unsupported("slice")),
            found => {
                return Err(JsonPathError::Unexpected {
                    path: self.path.to_string(),
                    offset: self.offset(),
                    found,
                })
            }
        };
        match self.chars.next() {
            Some((_, ']')) => Ok(segment),
            Some((offset, found)) => Err(match found {
                ':' | ',' => self.unsupported("slice"),
                _ => JsonPathError::Unexpected {
                    path: self.path.to_string(),
                    offset,
                    found,
                },
            }),
            None => Err(JsonPathError::Unterminated(self.path.to_string())),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.path.len(), |&(i, _)| i)
    }

    fn unsupported(&self, operator: &str) -> JsonPathError {
        JsonPathError::Unsupported {
            path: self.path.to_string(),
            operator: operator.to_string(),
        }
    }
}

/// Parses `document` and reads the value at `path`.
///
/// Returns `None` when the text is not JSON, the path is malformed or
/// nothing lives at the path.
pub fn get_property_value(document: &str, path: &str) -> Option<Value> {
    let document = parse_document(document)?;
    get_property_value_in(&document, path)
}

/// Reads the value at `path` in an already parsed document.
pub fn get_property_value_in(document: &Value, path: &str) -> Option<Value> {
    let path = parse_path(path)?;
    let value = path.select(document);
    if value.is_none() {
        warn!(%path, "no value at json path");
    }
    value.cloned()
}

/// Sets `key = value` on the object at `path` and returns the whole document
/// re-serialized. The value is stored as a JSON string.
pub fn add_property_value(document: &str, path: &str, key: &str, value: &str) -> Option<String> {
    let document = parse_document(document)?;
    add_property_value_in(&document, path, key, value)
}

/// Like `add_property_value`, starting from a parsed document. `document`
/// itself is left untouched.
pub fn add_property_value_in(
    document: &Value,
    path: &str,
    key: &str,
    value: &str,
) -> Option<String> {
    let path = parse_path(path)?;
    let mut copy = document.clone();
    if let Err(err) = path.put(&mut copy, key, Value::String(value.to_string())) {
        warn!(error = %err, "failed to add json property");
        return None;
    }
    match serde_json::to_string(&copy) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(error = %err, "failed to serialize json document");
            None
        }
    }
}

/// Parses text whose top level must be a JSON object.
pub fn get_json_object(text: &str) -> Option<Map<String, Value>> {
    into_object(parse_document(text)?)
}

/// Reads a JSON object from a byte or character stream.
pub fn get_json_object_from_reader<R: Read>(reader: R) -> Option<Map<String, Value>> {
    match serde_json::from_reader(reader) {
        Ok(value) => into_object(value),
        Err(err) => {
            warn!(error = %err, "failed to parse json stream");
            None
        }
    }
}

fn parse_document(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(error = %err, "failed to parse json document");
            None
        }
    }
}

fn parse_path(path: &str) -> Option<JsonPath> {
    match JsonPath::parse(path) {
        Ok(path) => Some(path),
        Err(err) => {
            warn!(error = %err, "invalid json path");
            None
        }
    }
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => {
            warn!(kind = json_kind(&other), "json document is not an object");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
