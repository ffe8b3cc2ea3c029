//! Canonical document → text.

use crate::error::SerializeError;
use crate::primitives::number_to_string;
use crate::state::Check;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};
use std::io;

/// Compact JSON text for the composite fields the canonical document stores
/// as strings (`filter_data`, `event_trigger_data`, ...). Floats are written
/// in the reporting client's number notation, so `5.0` → `5` and
/// `1e16` → `10000000000000000`.
pub fn canonical_json(value: &Value) -> Check<Value> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, ClientNumbers);
    value
        .serialize(&mut serializer)
        .map_err(|e| format!("failed to encode canonical value: {}", e))?;
    String::from_utf8(out)
        .map(Value::String)
        .map_err(|e| format!("failed to encode canonical value: {}", e))
}

/// Compact formatter that writes floats through [`number_to_string`].
struct ClientNumbers;

impl Formatter for ClientNumbers {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(number_to_string(value).as_bytes())
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.write_f64(writer, f64::from(value))
    }
}

/// Render a canonical document as JSON with two-space indentation.
pub fn to_pretty_json(expected: &Map<String, Value>) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(expected).map_err(|e| SerializeError {
        message: format!("failed to serialize to JSON: {}", e),
    })
}

/// Render a canonical document as YAML. Keys keep their canonical order.
pub fn to_yaml(expected: &Map<String, Value>) -> Result<String, SerializeError> {
    serde_saphyr::to_string(expected).map_err(|e| SerializeError {
        message: format!("failed to serialize to YAML: {}", e),
    })
}
