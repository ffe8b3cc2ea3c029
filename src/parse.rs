use crate::error::{ParseError, ParseErrorKind};
use serde_json::{Map, Value, error::Category};

/// Parse a raw header value into a JSON object with lower-cased top-level
/// keys.
///
/// Performs JSON deserialization and key folding only. Does NOT validate any
/// field. When two keys fold to the same name, the later value wins and keeps
/// the position of the first.
pub fn parse(input: &str) -> Result<Map<String, Value>, ParseError> {
    let value: Value = serde_json::from_str(input).map_err(|e| ParseError {
        kind: match e.classify() {
            Category::Eof => ParseErrorKind::UnexpectedEof,
            _ => ParseErrorKind::Syntax,
        },
        message: e.to_string(),
        line: Some(e.line()),
        column: Some(e.column()),
    })?;

    match value {
        Value::Object(map) => Ok(fold_keys(map)),
        _ => Err(ParseError {
            kind: ParseErrorKind::NotAnObject,
            message: "header value must be a JSON object".to_string(),
            line: None,
            column: None,
        }),
    }
}

/// Lower-case every top-level key. Nested objects are left untouched.
pub fn fold_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut folded = Map::with_capacity(map.len());
    for (key, value) in map {
        folded.insert(key.to_lowercase(), value);
    }
    folded
}
