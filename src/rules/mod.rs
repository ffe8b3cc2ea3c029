//! Field rules: the last link of every combinator chain.
//!
//! A rule receives an already shape-checked value, applies the field's domain
//! constraints and writes the canonical value into [`Context::expected`].
//! Rules shared by source and trigger headers live here.

pub mod redirect;
pub mod source;
pub mod trigger;

use crate::context::Context;
use crate::enums::HeaderType;
use crate::primitives::{exceeds, is_hex, quoted, utf16_len, utf8_len};
use crate::serialize::canonical_json;
use crate::state::{Check, ValidationState};
use serde_json::Value;

pub fn debug_key(_state: &mut ValidationState, ctx: &mut Context, value: u64) -> Check {
    ctx.set("debug_key", value);
    Ok(())
}

pub fn debug_reporting(_state: &mut ValidationState, ctx: &mut Context, value: bool) -> Check {
    ctx.set("debug_reporting", value);
    Ok(())
}

pub fn debug_join_key(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    ctx.set("debug_join_key", value);
    Ok(())
}

pub fn debug_ad_id(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    ctx.set("debug_ad_id", value);
    Ok(())
}

/// `attribution_scopes` on either header. Sources additionally enforce the
/// dependency on `attribution_scope_limit` and `max_event_states`.
pub fn attribution_scopes(
    _state: &mut ValidationState,
    ctx: &mut Context,
    scopes: &[Value],
) -> Check {
    if ctx.header.header_type == HeaderType::Source {
        let scratch = &ctx.scratch;
        if !scratch.attribution_scope_limit_present && !scopes.is_empty() {
            return Err(
                "attribution scopes array must be empty if attribution scope limit is not present"
                    .to_string(),
            );
        }
        if !scratch.attribution_scope_limit_present && scratch.max_event_states_present {
            return Err(
                "max event states must not be present if attribution scope limit is not present"
                    .to_string(),
            );
        }
        if scratch.attribution_scope_limit_present
            && let Some(limit) = scratch.attribution_scope_limit_value
            && u64::try_from(limit).map_or(true, |limit| exceeds(scopes.len(), limit))
        {
            return Err(
                "attribution scopes array size exceeds the provided attribution_scope_limit"
                    .to_string(),
            );
        }
    }

    let names = scopes
        .iter()
        .map(|scope| scope.as_str().ok_or_else(|| "must be an array of strings".to_string()))
        .collect::<Check<Vec<&str>>>()?;

    let cap = ctx.flags.max_32_bit_integer;
    if exceeds(names.len(), cap) {
        return Err("exceeded max number of scopes per source".to_string());
    }
    if names.iter().any(|name| exceeds(utf16_len(name), cap)) {
        return Err("exceeded max scope string length".to_string());
    }

    let list = Value::Array(scopes.to_vec());
    let canonical = match ctx.header.header_type {
        HeaderType::Trigger => canonical_json(&list)?,
        _ => list,
    };
    ctx.set("attribution_scopes", canonical);
    Ok(())
}

/// An aggregation key name, either a key of `aggregation_keys` /
/// `aggregatable_values` or an entry of `source_keys`.
pub fn aggregate_key_id(ctx: &Context, id: &str, field: Option<&str>) -> Check {
    let prefix = field.map(quoted).unwrap_or_default();
    if id.is_empty() {
        return Err(format!("{}null or empty aggregate key string", prefix));
    }
    if exceeds(utf8_len(id), ctx.flags.max_bytes_per_attribution_aggregate_key_id) {
        return Err(format!(
            "{}exceeded max bytes per attribution aggregate key id string",
            prefix
        ));
    }
    Ok(())
}

/// A `0x`-prefixed hexadecimal key piece.
pub fn aggregate_key_piece(ctx: &Context, piece: Option<&str>) -> Check {
    let Some(piece) = piece.filter(|p| !p.is_empty()) else {
        return Err("key piece value must not be null or empty string".to_string());
    };
    if !piece.starts_with("0x") && !piece.starts_with("0X") {
        return Err("key piece value must start with '0x' or '0X'".to_string());
    }

    let (min, max) = (
        ctx.flags.min_bytes_per_aggregate_value,
        ctx.flags.max_bytes_per_aggregate_value,
    );
    let size = utf8_len(piece);
    if (size as u64) < min || exceeds(size, max) {
        return Err(format!(
            "key piece value string size must be in the byte range ({} bytes - {} bytes)",
            min, max
        ));
    }
    if !is_hex(&piece[2..]) {
        return Err("key piece values must be hexadecimal".to_string());
    }
    Ok(())
}
