//! Rules for `Attribution-Reporting-Register-Source` fields.

use crate::config::Flags;
use crate::context::Context;
use crate::enums::SourceType;
use crate::filters::validate_filter_map;
use crate::primitives::{
    clamp_seconds, exceeds, is_host_label, parse_url, round_to_multiple, stringify, to_millis,
    utf16_len,
};
use crate::rules::{aggregate_key_id, aggregate_key_piece};
use crate::serialize::canonical_json;
use crate::state::{Check, ValidationState};
use serde_json::{Map, Value};

const APP_SCHEME: &str = "android-app";

pub fn destination(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    let url = parse_url(value)?;
    if url.scheme() != APP_SCHEME {
        return Err("app URL host/scheme is invalid".to_string());
    }
    ctx.set("destination", Value::Array(vec![Value::from(value)]));
    Ok(())
}

pub fn source_event_id(_state: &mut ValidationState, ctx: &mut Context, value: u64) -> Check {
    ctx.set("source_event_id", value);
    Ok(())
}

pub fn priority(_state: &mut ValidationState, ctx: &mut Context, value: i64) -> Check {
    ctx.set("priority", value);
    Ok(())
}

pub fn shared_debug_key(_state: &mut ValidationState, ctx: &mut Context, value: u64) -> Check {
    ctx.set("shared_debug_key", value);
    Ok(())
}

// ─── Windows ────────────────────────────────────────────────────────────────

/// Clamp into the expiration bounds. Event sources are further rounded to a
/// whole number of minimum expirations (days, by default).
pub fn expiry(_state: &mut ValidationState, ctx: &mut Context, value: u64) -> Check {
    let min = ctx.flags.min_reporting_register_source_expiration_in_seconds;
    let max = ctx.flags.max_reporting_register_source_expiration_in_seconds;
    let mut expiry = clamp_seconds(i128::from(value), min, max);
    if ctx.header.source_type == Some(SourceType::Event) {
        expiry = round_to_multiple(expiry, min);
    }
    ctx.set("expiry", expiry);
    ctx.set("aggregatable_report_window", to_millis(expiry));
    Ok(())
}

/// Report windows never outlive the canonical expiry, so `expiry` must run
/// first.
fn report_window(ctx: &Context, value: u64, minimum: u64) -> u64 {
    let max = ctx.flags.max_reporting_register_source_expiration_in_seconds;
    let window = clamp_seconds(i128::from(value), minimum, max);
    let expiry = ctx.expected_u64("expiry").unwrap_or(max);
    to_millis(window.min(expiry))
}

pub fn event_report_window(_state: &mut ValidationState, ctx: &mut Context, value: u64) -> Check {
    let window = report_window(ctx, value, ctx.flags.minimum_event_report_window_in_seconds);
    ctx.set("event_report_window", window);
    ctx.scratch.effective_expiry = Some(window);
    Ok(())
}

pub fn aggregatable_report_window(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: u64,
) -> Check {
    let window = report_window(
        ctx,
        value,
        ctx.flags.minimum_aggregatable_report_window_in_seconds,
    );
    ctx.set("aggregatable_report_window", window);
    Ok(())
}

pub fn install_attribution_window(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: i64,
) -> Check {
    let window = clamp_seconds(
        i128::from(value),
        ctx.flags.min_install_attribution_window,
        ctx.flags.max_install_attribution_window,
    );
    ctx.set("install_attribution_window", to_millis(window));
    Ok(())
}

pub fn post_install_exclusivity_window(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: i64,
) -> Check {
    let window = clamp_seconds(
        i128::from(value),
        ctx.flags.min_post_install_exclusivity_window,
        ctx.flags.max_post_install_exclusivity_window,
    );
    ctx.set("post_install_exclusivity_window", to_millis(window));
    Ok(())
}

pub fn reinstall_reattribution_window(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: i64,
) -> Check {
    let window = clamp_seconds(
        i128::from(value),
        0,
        ctx.flags.max_reinstall_reattribution_window_seconds,
    );
    ctx.set("reinstall_reattribution_window", to_millis(window));
    Ok(())
}

// ─── Web destinations ───────────────────────────────────────────────────────

/// Reduce each destination to `scheme://host` and de-duplicate, keeping the
/// first occurrence's position.
pub fn web_destination(
    _state: &mut ValidationState,
    ctx: &mut Context,
    destinations: &[Value],
) -> Check {
    let urls = destinations
        .iter()
        .map(|d| {
            d.as_str()
                .ok_or_else(|| "must be a string or an array of string".to_string())
        })
        .collect::<Check<Vec<&str>>>()?;

    if exceeds(
        urls.len(),
        ctx.flags.max_distinct_web_destinations_in_source_registration,
    ) {
        return Err("exceeded max distinct web destinations".to_string());
    }
    if urls.is_empty() {
        return Err("no web destinations present".to_string());
    }

    let mut sites: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        let site = web_site(&ctx.flags, url)?;
        if !sites.contains(&site) {
            sites.push(site);
        }
    }
    ctx.set(
        "web_destination",
        Value::Array(sites.into_iter().map(Value::String).collect()),
    );
    Ok(())
}

fn web_site(flags: &Flags, text: &str) -> Check<String> {
    let url = parse_url(text)?;
    let scheme = url.scheme();
    let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
        return Err("URL is missing hostname/domain".to_string());
    };

    if scheme == "https" && matches!(host, "127.0.0.1" | "localhost") {
        let site = format!("{}://{}", scheme, host);
        parse_url(&site)?;
        return Ok(site);
    }

    let mut hostname = host
        .to_lowercase()
        .replace(['\u{3002}', '\u{FF0E}', '\u{FF61}'], ".");
    if hostname.ends_with('.') {
        hostname.pop();
    }

    if exceeds(
        utf16_len(&hostname),
        flags.max_web_destination_hostname_character_length,
    ) {
        return Err("URL hostname/domain exceeds max character length".to_string());
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if exceeds(labels.len(), flags.max_web_destination_hostname_parts) {
        return Err("exceeded the max number of URL hostname parts".to_string());
    }

    let (min, max) = (
        flags.min_web_destination_hostname_part_character_length,
        flags.max_web_destination_hostname_part_character_length,
    );
    for (i, label) in labels.iter().enumerate() {
        let len = utf16_len(label);
        if (len as u64) < min || exceeds(len, max) {
            return Err(format!(
                "URL hostname part character length must be in the range of {}-{}",
                min, max
            ));
        }
        if !is_host_label(label) {
            return Err(
                "URL hostname part character length must alphanumeric, hyphen, or underscore"
                    .to_string(),
            );
        }
        if label.starts_with(['-', '_']) || label.ends_with(['-', '_']) {
            return Err(
                "invalid URL hostname part starting/ending character (hypen/underscore)"
                    .to_string(),
            );
        }
        if i == labels.len() - 1 && label.starts_with(|c: char| c.is_ascii_digit()) {
            return Err("last hostname part can not start with a number".to_string());
        }
    }

    let site = format!("{}://{}", scheme, hostname);
    parse_url(&site)?;
    Ok(site)
}

// ─── Filters and aggregation ────────────────────────────────────────────────

pub fn filter_data(
    _state: &mut ValidationState,
    ctx: &mut Context,
    filters: &Map<String, Value>,
) -> Check {
    ctx.enter_source_filters();
    if filters.contains_key("source_type") {
        return Err("filter: source_type is not allowed".to_string());
    }
    validate_filter_map(ctx, filters, None)?;
    ctx.set("filter_data", canonical_json(&Value::Object(filters.clone()))?);
    Ok(())
}

pub fn aggregation_keys(
    _state: &mut ValidationState,
    ctx: &mut Context,
    keys: &Map<String, Value>,
) -> Check {
    if exceeds(keys.len(), ctx.flags.max_aggregate_keys_per_source_registration) {
        return Err("exceeded max number of aggregation keys per source registration".to_string());
    }
    for (id, piece) in keys {
        aggregate_key_id(ctx, id, None)?;
        let piece = (!piece.is_null()).then(|| stringify(piece));
        aggregate_key_piece(ctx, piece.as_deref())?;
    }
    ctx.set("aggregation_keys", canonical_json(&Value::Object(keys.clone()))?);
    Ok(())
}

pub fn shared_aggregation_keys(
    _state: &mut ValidationState,
    ctx: &mut Context,
    keys: &[Value],
) -> Check {
    ctx.set("shared_aggregation_keys", canonical_json(&Value::Array(keys.to_vec()))?);
    Ok(())
}

pub fn shared_filter_data_keys(
    _state: &mut ValidationState,
    ctx: &mut Context,
    keys: &[Value],
) -> Check {
    ctx.set("shared_filter_data_keys", canonical_json(&Value::Array(keys.to_vec()))?);
    Ok(())
}

// ─── Event-level reporting ──────────────────────────────────────────────────

pub fn trigger_data_matching(_state: &mut ValidationState, ctx: &mut Context, value: &str) -> Check {
    let mode = value.to_lowercase();
    if mode != "modulus" && mode != "exact" {
        return Err("value must be 'exact' or 'modulus' (case-insensitive)".to_string());
    }
    ctx.set("trigger_data_matching", value.to_uppercase());
    Ok(())
}

pub fn coarse_event_report_destinations(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: bool,
) -> Check {
    ctx.set("coarse_event_report_destinations", value);
    Ok(())
}

pub fn drop_source_if_installed(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: bool,
) -> Check {
    ctx.set("drop_source_if_installed", value);
    Ok(())
}

// ─── Attribution scopes ─────────────────────────────────────────────────────

/// Recorded in scratch even when rejected, so `attribution_scopes` still
/// compares against it.
pub fn attribution_scope_limit(
    _state: &mut ValidationState,
    ctx: &mut Context,
    value: i64,
) -> Check {
    ctx.scratch.attribution_scope_limit_value = Some(value);
    if value <= 0 {
        return Err("must be greater than 0".to_string());
    }
    ctx.set("attribution_scope_limit", value);
    Ok(())
}

pub fn max_event_states(_state: &mut ValidationState, ctx: &mut Context, value: i64) -> Check {
    if value <= 0 {
        return Err("must be greater than 0".to_string());
    }
    if i128::from(value) > i128::from(ctx.flags.max_report_states_per_source_registration) {
        return Err("exceeds max report states per source registration".to_string());
    }
    ctx.set("max_event_states", value);
    Ok(())
}
