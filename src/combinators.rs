//! Shape-checking wrappers around field rules.
//!
//! Each combinator checks (and for the `opt_*` variants, coerces) the shape
//! of a raw JSON value before handing a typed value to the wrapped rule.
//! They nest: a field that must be present-or-null, a string, and a valid
//! uint64 is declared as `optional(string(uint64(rule)))`.
//!
//! Rules return [`Check`]. Only [`optional`] turns an `Err` into a recorded
//! error, so the first failure anywhere in a chain ends that field.

use crate::context::Context;
use crate::enums::JsonKind;
use crate::primitives::{parse_i64, parse_u64, stringify, to_list};
use crate::state::{Check, ValidationState};
use serde_json::{Map, Value};

/// Run `rule` only when `key` is present with a non-null value. Absent and
/// null fields keep their initialized canonical default.
pub fn optional<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &str, &Map<String, Value>)
where
    F: Fn(&mut ValidationState, &mut Context, &Value) -> Check,
{
    move |state, ctx, key, object| {
        if let Some(value) = object.get(key).filter(|v| !v.is_null())
            && let Err(message) = rule(state, ctx, value)
        {
            state.error(message);
        }
    }
}

pub fn string<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &str) -> Check,
{
    move |state, ctx, value| match value {
        Value::String(s) => rule(state, ctx, s),
        _ => Err("must be a string".to_string()),
    }
}

/// Strings pass through; other non-null values are stringified.
pub fn opt_string<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &str) -> Check,
{
    move |state, ctx, value| match value {
        Value::String(s) => rule(state, ctx, s),
        Value::Null => Err("must be a string or able to cast to string".to_string()),
        other => rule(state, ctx, &stringify(other)),
    }
}

/// Like [`opt_string`], but `null` reads as the empty string.
pub fn opt_string_fallback<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &str) -> Check,
{
    move |state, ctx, value| match value {
        Value::String(s) => rule(state, ctx, s),
        Value::Null => rule(state, ctx, ""),
        other => rule(state, ctx, &stringify(other)),
    }
}

pub fn boolean<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, bool) -> Check,
{
    move |state, ctx, value| match value {
        Value::Bool(b) => rule(state, ctx, *b),
        _ => Err("must be a boolean".to_string()),
    }
}

/// Booleans, or `"true"`/`"false"` in any letter case.
pub fn opt_boolean<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, bool) -> Check,
{
    move |state, ctx, value| match value {
        Value::Bool(b) => rule(state, ctx, *b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => rule(state, ctx, true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => rule(state, ctx, false),
        _ => Err("must be a boolean".to_string()),
    }
}

/// Booleans, or exactly `"true"`/`"false"`. Anything else reads as `false`.
pub fn opt_boolean_fallback<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, bool) -> Check,
{
    move |state, ctx, value| match value {
        Value::Bool(b) => rule(state, ctx, *b),
        Value::String(s) if s == "true" => rule(state, ctx, true),
        _ => rule(state, ctx, false),
    }
}

pub fn object<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &Map<String, Value>) -> Check,
{
    move |state, ctx, value| match value {
        Value::Object(map) => rule(state, ctx, map),
        _ => Err("must be an object".to_string()),
    }
}

pub fn array<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &[Value]) -> Check,
{
    move |state, ctx, value| match value {
        Value::Array(items) => rule(state, ctx, items),
        _ => Err("must be an array".to_string()),
    }
}

/// Arrays pass through; a lone `element` value (any non-null scalar when
/// `element` is `None`) is wrapped in a one-element array.
pub fn opt_array<F>(
    rule: F,
    element: Option<JsonKind>,
) -> impl Fn(&mut ValidationState, &mut Context, &Value) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, &[Value]) -> Check,
{
    move |state, ctx, value| match to_list(value, element) {
        Some(items) => rule(state, ctx, &items),
        None => Err(match element {
            Some(kind) => format!("must be a {} or an array of {}", kind, kind),
            None => "must be a array or able to cast to array".to_string(),
        }),
    }
}

pub fn uint64<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &str) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, u64) -> Check,
{
    move |state, ctx, text| {
        let value = parse_u64(text).map_err(|e| e.to_string())?;
        rule(state, ctx, value)
    }
}

pub fn int64<F>(rule: F) -> impl Fn(&mut ValidationState, &mut Context, &str) -> Check
where
    F: Fn(&mut ValidationState, &mut Context, i64) -> Check,
{
    move |state, ctx, text| {
        let value = parse_i64(text).map_err(|e| e.to_string())?;
        rule(state, ctx, value)
    }
}
