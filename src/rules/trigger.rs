//! Rules for `Attribution-Reporting-Register-Trigger` fields.
//!
//! Most trigger fields are arrays of loosely-typed objects. Each entry is
//! rebuilt key by key into its canonical form, and the whole list is stored
//! as compact JSON text.

use crate::context::Context;
use crate::filters::{
    FilterMap, coerce_attribution_config_filter_map, to_value, validate_filter_set, wrap_filters,
};
use crate::primitives::{
    IntegerError, clamp_seconds, exceeds, parse_i32, parse_i64, parse_u64, parse_url, quoted,
    stringify, utf16_len,
};
use crate::rules::{aggregate_key_id, aggregate_key_piece};
use crate::serialize::canonical_json;
use crate::state::{Check, ValidationState};
use serde_json::{Map, Value, json};

// ─── Entry helpers ──────────────────────────────────────────────────────────

fn entries(items: &[Value]) -> Check<Vec<&Map<String, Value>>> {
    items
        .iter()
        .map(|item| {
            item.as_object()
                .ok_or_else(|| "must be an array of object(s)".to_string())
        })
        .collect()
}

fn prefixed(key: &str) -> impl Fn(IntegerError) -> String + '_ {
    move |e| format!("{}{}", quoted(key), e)
}

fn string_entry<'a>(key: &str, value: &'a Value) -> Check<&'a str> {
    value
        .as_str()
        .ok_or_else(|| format!("{}must be a string", quoted(key)))
}

/// Numbers and numeric strings alike, read as a signed 64-bit integer.
fn lenient_i64(key: &str, value: &Value) -> Check<i64> {
    parse_i64(&stringify(value)).map_err(prefixed(key))
}

/// Wrap and validate a nested `filters` / `not_filters` value.
fn nested_filters(ctx: &Context, key: &str, value: &Value) -> Check<Vec<FilterMap>> {
    let set = wrap_filters(value, Some(key))?;
    validate_filter_set(ctx, &set, Some(key))?;
    Ok(set)
}

// ─── Event-level trigger data ───────────────────────────────────────────────

pub fn event_trigger_data(
    _state: &mut ValidationState,
    ctx: &mut Context,
    items: &[Value],
) -> Check {
    ctx.enter_trigger_filters();
    let mut canonical = Vec::with_capacity(items.len());
    for entry in entries(items)? {
        let mut out = Map::new();
        out.insert("trigger_data".to_string(), Value::from(0));
        for (key, value) in entry {
            if value.is_null() {
                continue;
            }
            let parsed = match key.as_str() {
                "trigger_data" | "deduplication_key" => {
                    Value::from(parse_u64(string_entry(key, value)?).map_err(prefixed(key))?)
                }
                "priority" => {
                    Value::from(parse_i64(string_entry(key, value)?).map_err(prefixed(key))?)
                }
                "value" => Value::from(trigger_value(ctx, key, value)?),
                "filters" | "not_filters" => to_value(nested_filters(ctx, key, value)?),
                _ => continue,
            };
            out.insert(key.clone(), parsed);
        }
        canonical.push(Value::Object(out));
    }
    ctx.set("event_trigger_data", canonical_json(&Value::Array(canonical))?);
    Ok(())
}

fn trigger_value(ctx: &Context, key: &str, value: &Value) -> Check<i64> {
    if !value.is_number() {
        return Err("'value' must be a number".to_string());
    }
    let amount = lenient_i64(key, value)?;
    if amount < 1 {
        return Err("'value' must be greater than 0".to_string());
    }
    let max = ctx.flags.max_bucket_threshold;
    if i128::from(amount) > i128::from(max) {
        return Err(format!("'value' exceeds max threshold of {}", max));
    }
    Ok(amount)
}

// ─── Aggregatable reports ───────────────────────────────────────────────────

/// Entries keep every key they were given. Filters are replaced by their
/// wrapped form and a missing `source_keys` defaults to `[]`.
pub fn aggregatable_trigger_data(
    _state: &mut ValidationState,
    ctx: &mut Context,
    items: &[Value],
) -> Check {
    ctx.enter_trigger_filters();
    let mut canonical = Vec::with_capacity(items.len());
    for entry in entries(items)? {
        if !entry.contains_key("key_piece") {
            return Err("'key_piece' must be present in each element/object of the array".to_string());
        }
        let mut out = entry.clone();
        for (key, value) in entry {
            match key.as_str() {
                "key_piece" => {
                    let piece = (!value.is_null()).then(|| stringify(value));
                    aggregate_key_piece(ctx, piece.as_deref())?;
                }
                "source_keys" if !value.is_null() => source_keys(ctx, key, value)?,
                "filters" | "not_filters" if !value.is_null() => {
                    out.insert(key.clone(), to_value(nested_filters(ctx, key, value)?));
                }
                "x_network_data" if !value.is_null() && !value.is_object() => {
                    return Err("'x_network_data' must be an object".to_string());
                }
                _ => {}
            }
        }
        if !out.contains_key("source_keys") {
            out.insert("source_keys".to_string(), Value::Array(Vec::new()));
        }
        canonical.push(Value::Object(out));
    }
    ctx.set("aggregatable_trigger_data", canonical_json(&Value::Array(canonical))?);
    Ok(())
}

fn source_keys(ctx: &Context, key: &str, value: &Value) -> Check {
    let Value::Array(ids) = value else {
        return Err("'source_keys' must be an array".to_string());
    };
    if ctx.scratch.should_check_filter_size
        && exceeds(ids.len(), ctx.flags.max_aggregate_keys_per_trigger_registration)
    {
        return Err(
            "'source_keys' array size exceeds max aggregate keys per trigger registration limit"
                .to_string(),
        );
    }
    for id in ids {
        let Value::String(id) = id else {
            return Err("each element in 'source_keys' must be a string".to_string());
        };
        aggregate_key_id(ctx, id, Some(key))?;
    }
    Ok(())
}

pub fn aggregatable_values(
    _state: &mut ValidationState,
    ctx: &mut Context,
    values: &Map<String, Value>,
) -> Check {
    ctx.scratch.should_check_filter_size = ctx.flags.trigger_size_checks();
    if ctx.scratch.should_check_filter_size
        && exceeds(values.len(), ctx.flags.max_aggregate_keys_per_trigger_registration)
    {
        return Err("exceeds max aggregate keys per trigger registration".to_string());
    }

    let mut canonical = Map::new();
    for (id, value) in values {
        aggregate_key_id(ctx, id, None)?;
        if !value.is_number() {
            return Err("aggregate key value must be a number".to_string());
        }
        let amount = parse_i32(&stringify(value)).map_err(|e| e.to_string())?;
        if amount < 1 {
            return Err("aggregate key value must be greater than 0".to_string());
        }
        if i128::from(amount) > i128::from(ctx.flags.max_sum_of_aggregate_values_per_source) {
            return Err(
                "aggregate key value exceeds the max sum of aggregate values per source"
                    .to_string(),
            );
        }
        canonical.insert(id.clone(), Value::from(amount));
    }
    ctx.set("aggregatable_values", canonical_json(&Value::Object(canonical))?);
    Ok(())
}

pub fn aggregatable_deduplication_keys(
    _state: &mut ValidationState,
    ctx: &mut Context,
    items: &[Value],
) -> Check {
    ctx.enter_trigger_filters();
    if exceeds(
        items.len(),
        ctx.flags.max_aggregate_deduplication_keys_per_registration,
    ) {
        return Err("exceeds max aggregate deduplication keys per registration limit".to_string());
    }

    let mut canonical = Vec::with_capacity(items.len());
    for entry in entries(items)? {
        let mut out = Map::new();
        for (key, value) in entry {
            if value.is_null() {
                continue;
            }
            let parsed = match key.as_str() {
                "deduplication_key" => {
                    Value::from(parse_u64(string_entry(key, value)?).map_err(prefixed(key))?)
                }
                "filters" | "not_filters" => to_value(nested_filters(ctx, key, value)?),
                _ => continue,
            };
            out.insert(key.clone(), parsed);
        }
        canonical.push(Value::Object(out));
    }
    ctx.set(
        "aggregatable_deduplication_keys",
        canonical_json(&Value::Array(canonical))?,
    );
    Ok(())
}

// ─── Top-level filters ──────────────────────────────────────────────────────

fn top_level_filters(ctx: &mut Context, key: &str, value: &Value) -> Check {
    ctx.enter_trigger_filters();
    let set = wrap_filters(value, None)?;
    validate_filter_set(ctx, &set, None)?;
    ctx.set(key, canonical_json(&to_value(set))?);
    Ok(())
}

pub fn filters(_state: &mut ValidationState, ctx: &mut Context, value: &Value) -> Check {
    top_level_filters(ctx, "filters", value)
}

pub fn not_filters(_state: &mut ValidationState, ctx: &mut Context, value: &Value) -> Check {
    top_level_filters(ctx, "not_filters", value)
}

// ─── Cross-network attribution ──────────────────────────────────────────────

pub fn x_network_key_mapping(
    _state: &mut ValidationState,
    ctx: &mut Context,
    mapping: &Map<String, Value>,
) -> Check {
    for value in mapping.values() {
        let piece = match value {
            Value::Null => return Err("all values must be non-null".to_string()),
            Value::String(s) => s,
            _ => return Err("all values must be strings".to_string()),
        };
        if !piece.starts_with("0x") {
            return Err("all values must start with 0x".to_string());
        }
    }
    ctx.set(
        "x_network_key_mapping",
        canonical_json(&Value::Object(mapping.clone()))?,
    );
    Ok(())
}

/// Every entry names a `source_network`. Numeric fields accept numbers or
/// numeric strings; expiries are clamped into the source expiration bounds.
pub fn attribution_config(
    _state: &mut ValidationState,
    ctx: &mut Context,
    items: &[Value],
) -> Check {
    let configs = entries(items)?;
    let min_expiry = ctx.flags.min_reporting_register_source_expiration_in_seconds;
    let max_expiry = ctx.flags.max_reporting_register_source_expiration_in_seconds;

    let mut canonical = Vec::with_capacity(configs.len());
    for entry in configs {
        if entry.get("source_network").is_none_or(Value::is_null) {
            return Err(
                "'source_network' must be present and non-null in each element/object of the array"
                    .to_string(),
            );
        }
        let mut out = Map::new();
        for (key, value) in entry {
            if value.is_null() {
                continue;
            }
            let parsed = match key.as_str() {
                "source_network" => Value::String(stringify(value)),
                "source_priority_range" => priority_range(key, value)?,
                "source_filters" | "source_not_filters" | "filter_data" => {
                    let mut coerced = Vec::new();
                    for map in wrap_filters(value, Some(key))? {
                        coerced.push(coerce_attribution_config_filter_map(ctx, &map)?);
                    }
                    to_value(coerced)
                }
                "source_expiry_override" | "expiry" => {
                    let expiry = lenient_i64(key, value)?;
                    Value::from(clamp_seconds(i128::from(expiry), min_expiry, max_expiry))
                }
                "priority" | "post_install_exclusivity_window" => {
                    Value::from(lenient_i64(key, value)?)
                }
                _ => continue,
            };
            out.insert(key.clone(), parsed);
        }
        canonical.push(Value::Object(out));
    }
    ctx.set("attribution_config", canonical_json(&Value::Array(canonical))?);
    Ok(())
}

fn priority_range(key: &str, value: &Value) -> Check<Value> {
    let label = quoted(key);
    let Value::Object(range) = value else {
        return Err(format!("{}must be an object", label));
    };
    let (Some(start), Some(end)) = (range.get("start"), range.get("end")) else {
        return Err(format!("{}both keys ('start','end') must be present", label));
    };
    if start.is_null() || end.is_null() {
        return Err(format!(
            "{}both key values (start, end) must be string or able to cast to string",
            label
        ));
    }
    let start = lenient_i64("start", start)?;
    let end = lenient_i64("end", end)?;
    Ok(json!({ "start": start, "end": end }))
}

// ─── Aggregation settings ───────────────────────────────────────────────────

pub fn aggregation_coordinator_origin(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: &str,
) -> Check {
    if value.is_empty() {
        return Err("value must be non-empty".to_string());
    }
    parse_url(value)?;
    ctx.set("aggregation_coordinator_origin", value);
    Ok(())
}

pub fn aggregatable_source_registration_time(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: &str,
) -> Check {
    let mode = value.to_uppercase();
    if mode != "INCLUDE" && mode != "EXCLUDE" {
        return Err("must equal 'INCLUDE' or 'EXCLUDE' (case-insensitive)".to_string());
    }
    ctx.scratch.aggregatable_source_registration_time = Some(mode.clone());
    ctx.set("aggregatable_source_registration_time", mode);
    Ok(())
}

/// Only allowed when the source registration time is excluded from reports.
pub fn trigger_context_id(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    if ctx.scratch.aggregatable_source_registration_time.as_deref() == Some("INCLUDE") {
        return Err(
            "aggregatable_source_registration_time must not have the value 'INCLUDE'".to_string(),
        );
    }
    if exceeds(utf16_len(value), ctx.flags.max_trigger_context_id_string_length) {
        return Err("max string length exceeded".to_string());
    }
    ctx.set("trigger_context_id", value);
    Ok(())
}
