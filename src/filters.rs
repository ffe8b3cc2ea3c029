//! Filter-map and filter-set validation.
//!
//! A filter map is `{key: [string, ...]}`; a filter set is a list of maps.
//! Fields that accept a filter set also accept a bare map, which is wrapped
//! into a one-element set first.
//!
//! Behaviour depends on two scratch values set by the calling rule:
//! `can_include_lookback_window` and `should_check_filter_size`. Source
//! `filter_data` forbids `_lookback_window` and always size-checks keys;
//! trigger-level filters allow it and size-check unless the trigger header
//! limit feature is on.

use crate::context::Context;
use crate::enums::JsonKind;
use crate::primitives::{exceeds, parse_i64, quoted, stringify, to_list, utf8_len};
use crate::state::Check;
use serde_json::{Map, Value};

pub const LOOKBACK_WINDOW_KEY: &str = "_lookback_window";

pub type FilterMap = Map<String, Value>;

/// Wrap a bare filter map into a set and require every element to be an
/// object.
pub fn wrap_filters(value: &Value, field: Option<&str>) -> Check<Vec<FilterMap>> {
    let prefix = field.map(quoted).unwrap_or_default();
    let items = match value {
        Value::Array(_) | Value::Object(_) => to_list(value, Some(JsonKind::Object)),
        _ => None,
    }
    .ok_or_else(|| format!("{}must be an object or an array", prefix))?;

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(format!("{}must be an array of object(s)", prefix)),
        })
        .collect()
}

/// Validate every map of a filter set, stopping at the first failure.
pub fn validate_filter_set(ctx: &Context, set: &[FilterMap], field: Option<&str>) -> Check {
    let prefix = field.map(quoted).unwrap_or_default();
    if exceeds(set.len(), ctx.flags.max_filter_maps_per_filter_set) {
        return Err(format!(
            "{}array length exceeds the max filter maps per filter set limit",
            prefix
        ));
    }
    for map in set {
        validate_filter_map(ctx, map, field)?;
    }
    Ok(())
}

pub fn validate_filter_map(ctx: &Context, map: &FilterMap, field: Option<&str>) -> Check {
    let flags = &ctx.flags;
    let prefix = field.map(quoted).unwrap_or_default();
    if exceeds(map.len(), flags.max_attribution_filters) {
        return Err(format!("{}exceeded max attribution filters", prefix));
    }

    for (key, value) in map {
        let key_label = quoted(key);
        if ctx.scratch.should_check_filter_size
            && exceeds(utf8_len(key), flags.max_bytes_per_attribution_filter_string)
        {
            return Err(format!(
                "{}exceeded max bytes per attribution filter string",
                key_label
            ));
        }

        if key == LOOKBACK_WINDOW_KEY && flags.lookback_window_filter {
            if !ctx.scratch.can_include_lookback_window {
                return Err(format!("{}filter: _lookback_window is not allowed", prefix));
            }
            let window = parse_i64(&stringify(value))
                .map_err(|e| format!("{}{}", key_label, e))?;
            if window < 0 {
                return Err("lookback_window must be a positive number".to_string());
            }
            continue;
        }
        if key.starts_with('_') {
            return Err(format!("{}filter can not start with underscore", key_label));
        }

        let Value::Array(values) = value else {
            return Err(format!("{}filter value must be an array", key_label));
        };
        if exceeds(values.len(), flags.max_values_per_attribution_filter) {
            return Err(format!(
                "{}exceeded max values per attribution filter",
                key_label
            ));
        }
        for filter_value in values {
            let Value::String(s) = filter_value else {
                return Err(format!("{}filter values must be strings", key_label));
            };
            if exceeds(utf8_len(s), flags.max_bytes_per_attribution_filter_string) {
                return Err(format!(
                    "{}exceeded max bytes per attribution filter value string",
                    quoted(s)
                ));
            }
        }
    }
    Ok(())
}

/// Coerce a filter map nested in `attribution_config`. Values are read
/// leniently: `_lookback_window` becomes a number and every other filter
/// value becomes a string. Returns the coerced map.
pub fn coerce_attribution_config_filter_map(ctx: &Context, map: &FilterMap) -> Check<FilterMap> {
    let mut out = FilterMap::new();
    for (key, value) in map {
        let key_label = quoted(key);
        if key == LOOKBACK_WINDOW_KEY && ctx.flags.lookback_window_filter {
            if value.is_null() {
                return Err(format!(
                    "{}must be a string or able to cast to string",
                    key_label
                ));
            }
            let window = parse_i64(&stringify(value))
                .map_err(|e| format!("{}{}", key_label, e))?;
            out.insert(key.clone(), Value::from(window));
            continue;
        }

        let Value::Array(values) = value else {
            return Err(format!("{}filter value must be an array", key_label));
        };
        let mut coerced = Vec::with_capacity(values.len());
        for filter_value in values {
            if filter_value.is_null() {
                return Err(format!(
                    "{}filter values must be string or able to cast to string",
                    key_label
                ));
            }
            coerced.push(Value::String(stringify(filter_value)));
        }
        out.insert(key.clone(), Value::Array(coerced));
    }
    Ok(out)
}

/// Filter set as a JSON array, for canonical output.
pub fn to_value(set: Vec<FilterMap>) -> Value {
    Value::Array(set.into_iter().map(Value::Object).collect())
}
