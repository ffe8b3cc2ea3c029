//! Header validation: per-header default documents, field tables and entry
//! points.
//!
//! Returns **all** errors and warnings, not just the first. A field stops at
//! its first failure; the remaining fields still run.

use crate::combinators::*;
use crate::config::{Flags, HeaderOptions};
use crate::context::Context;
use crate::enums::{HeaderType, JsonKind, SourceType};
use crate::error::{Diagnostic, ValidationOutput};
use crate::parse::parse;
use crate::primitives::to_millis;
use crate::rules::redirect::{LOCATION_KEY, REDIRECT_CONFIG_KEY, REDIRECT_KEY};
use crate::rules::{self, redirect, source, trigger};
use crate::state::{FieldTable, ValidationState};
use serde_json::{Map, Value, json};

// ─── Default documents ──────────────────────────────────────────────────────

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Canonical source document before any field is read.
pub fn source_defaults(flags: &Flags) -> Map<String, Value> {
    let max_expiry = flags.max_reporting_register_source_expiration_in_seconds;
    into_map(json!({
        "source_event_id": 0,
        "debug_key": null,
        "destination": null,
        "expiry": max_expiry,
        "event_report_window": null,
        "aggregatable_report_window": to_millis(max_expiry),
        "priority": 0,
        "install_attribution_window": to_millis(flags.max_install_attribution_window),
        "post_install_exclusivity_window": to_millis(flags.min_post_install_exclusivity_window),
        "reinstall_reattribution_window": 0,
        "filter_data": null,
        "web_destination": null,
        "aggregation_keys": null,
        "shared_aggregation_keys": null,
        "debug_reporting": false,
        "debug_join_key": null,
        "debug_ad_id": null,
        "coarse_event_report_destinations": false,
        "shared_debug_key": null,
        "shared_filter_data_keys": null,
        "drop_source_if_installed": false,
        "trigger_data_matching": "MODULUS",
        "attribution_scopes": null,
        "attribution_scope_limit": null,
        "max_event_states": 3,
    }))
}

/// Canonical trigger document before any field is read.
pub fn trigger_defaults(flags: &Flags) -> Map<String, Value> {
    let registration_time = if flags.source_registration_time_optional_for_agg_reports {
        "EXCLUDE"
    } else {
        "INCLUDE"
    };
    into_map(json!({
        "attribution_config": null,
        "event_trigger_data": "[]",
        "filters": null,
        "not_filters": null,
        "aggregatable_trigger_data": null,
        "aggregatable_values": null,
        "aggregatable_deduplication_keys": null,
        "debug_key": null,
        "debug_reporting": false,
        "x_network_key_mapping": null,
        "debug_join_key": null,
        "debug_ad_id": null,
        "aggregation_coordinator_origin": null,
        "aggregatable_source_registration_time": registration_time,
        "trigger_context_id": null,
        "attribution_scopes": null,
    }))
}

/// Canonical redirect document before any field is read.
pub fn redirect_defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    for key in [LOCATION_KEY, REDIRECT_KEY, REDIRECT_CONFIG_KEY] {
        defaults.insert(key.to_string(), Value::Null);
    }
    defaults
}

// ─── Field tables ───────────────────────────────────────────────────────────

/// Source fields in evaluation order. `expiry` precedes both report windows,
/// and the scope limit precedes `attribution_scopes`.
pub fn source_table(flags: &Flags) -> FieldTable {
    let mut table = FieldTable::new();
    table.push("destination", optional(opt_string(source::destination)));
    table.push("source_event_id", optional(string(uint64(source::source_event_id))));
    table.push("expiry", optional(opt_string(uint64(source::expiry))));
    table.push(
        "event_report_window",
        optional(opt_string(uint64(source::event_report_window))),
    );
    table.push(
        "aggregatable_report_window",
        optional(opt_string(uint64(source::aggregatable_report_window))),
    );
    table.push("priority", optional(string(int64(source::priority))));
    table.push("debug_key", optional(string(uint64(rules::debug_key))));
    table.push("debug_reporting", optional(opt_boolean_fallback(rules::debug_reporting)));
    table.push(
        "install_attribution_window",
        optional(opt_string(int64(source::install_attribution_window))),
    );
    table.push(
        "post_install_exclusivity_window",
        optional(opt_string(int64(source::post_install_exclusivity_window))),
    );
    table.push("debug_ad_id", optional(opt_string_fallback(rules::debug_ad_id)));
    table.push("debug_join_key", optional(opt_string_fallback(rules::debug_join_key)));
    table.push(
        "web_destination",
        optional(opt_array(source::web_destination, Some(JsonKind::String))),
    );
    table.push("filter_data", optional(object(source::filter_data)));
    table.push("aggregation_keys", optional(object(source::aggregation_keys)));

    if flags.attribution_scopes {
        table.push(
            "attribution_scope_limit",
            optional(opt_string(int64(source::attribution_scope_limit))),
        );
        table.push(
            "max_event_states",
            optional(opt_string(int64(source::max_event_states))),
        );
        table.push("attribution_scopes", optional(array(rules::attribution_scopes)));
    }
    if flags.trigger_data_matching {
        table.push(
            "trigger_data_matching",
            optional(opt_string(source::trigger_data_matching)),
        );
    }
    if flags.coarse_event_report_destination {
        table.push(
            "coarse_event_report_destinations",
            optional(opt_boolean(source::coarse_event_report_destinations)),
        );
    }
    if flags.shared_source_debug_key {
        table.push(
            "shared_debug_key",
            optional(opt_string(uint64(source::shared_debug_key))),
        );
    }
    if flags.xna {
        table.push(
            "shared_aggregation_keys",
            optional(array(source::shared_aggregation_keys)),
        );
    }
    if flags.shared_filter_data_keys {
        table.push(
            "shared_filter_data_keys",
            optional(array(source::shared_filter_data_keys)),
        );
    }
    if flags.preinstall_check {
        table.push(
            "drop_source_if_installed",
            optional(opt_boolean(source::drop_source_if_installed)),
        );
    }
    if flags.enable_reinstall_reattribution {
        table.push(
            "reinstall_reattribution_window",
            optional(opt_string(int64(source::reinstall_reattribution_window))),
        );
    }
    table
}

/// Trigger fields in evaluation order. `aggregatable_source_registration_time`
/// precedes `trigger_context_id`.
pub fn trigger_table(flags: &Flags) -> FieldTable {
    let mut table = FieldTable::new();
    table.push("debug_key", optional(string(uint64(rules::debug_key))));
    table.push("debug_join_key", optional(opt_string_fallback(rules::debug_join_key)));
    table.push("debug_reporting", optional(opt_boolean_fallback(rules::debug_reporting)));
    table.push("debug_ad_id", optional(opt_string_fallback(rules::debug_ad_id)));
    table.push("event_trigger_data", optional(array(trigger::event_trigger_data)));
    table.push(
        "aggregatable_trigger_data",
        optional(array(trigger::aggregatable_trigger_data)),
    );
    table.push("aggregatable_values", optional(object(trigger::aggregatable_values)));
    table.push("filters", optional(trigger::filters));
    table.push("not_filters", optional(trigger::not_filters));
    table.push(
        "aggregatable_deduplication_keys",
        optional(array(trigger::aggregatable_deduplication_keys)),
    );

    if flags.attribution_scopes {
        table.push("attribution_scopes", optional(array(rules::attribution_scopes)));
    }
    if flags.xna {
        table.push(
            "x_network_key_mapping",
            optional(object(trigger::x_network_key_mapping)),
        );
        table.push("attribution_config", optional(array(trigger::attribution_config)));
    }
    if flags.aggregation_coordinator_origin {
        table.push(
            "aggregation_coordinator_origin",
            optional(opt_string(trigger::aggregation_coordinator_origin)),
        );
    }
    if flags.source_registration_time_optional_for_agg_reports {
        table.push(
            "aggregatable_source_registration_time",
            optional(opt_string_fallback(trigger::aggregatable_source_registration_time)),
        );
    }
    if flags.trigger_context_id {
        table.push(
            "trigger_context_id",
            optional(string(trigger::trigger_context_id)),
        );
    }
    table
}

/// Redirect fields in evaluation order. The config precedes `location`.
pub fn redirect_table() -> FieldTable {
    let mut table = FieldTable::new();
    table.push(REDIRECT_CONFIG_KEY, optional(string(redirect::redirect_config)));
    table.push(REDIRECT_KEY, optional(array(redirect::reporting_redirects)));
    table.push(LOCATION_KEY, optional(string(redirect::location)));
    table
}

// ─── Entry points ───────────────────────────────────────────────────────────

fn present(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(|v| !v.is_null())
}

fn run(ctx: &mut Context, object: &Map<String, Value>, table: &FieldTable) -> ValidationOutput {
    tracing::debug!(
        header = %ctx.header.header_type,
        fields = table.len(),
        "validating header"
    );
    let mut state = ValidationState::new();
    state.validate(ctx, object, table);
    let (errors, warnings) = state.into_parts();
    tracing::debug!(
        header = %ctx.header.header_type,
        errors = errors.len(),
        warnings = warnings.len(),
        "header validated"
    );
    ValidationOutput {
        errors,
        warnings,
        expected_value: std::mem::take(&mut ctx.expected),
    }
}

fn parse_or_reject(text: &str) -> Result<Map<String, Value>, ValidationOutput> {
    parse(text).map_err(|e| {
        tracing::debug!(error = %e, "header body rejected");
        ValidationOutput::rejected(Diagnostic::error(Vec::new(), e.to_string()))
    })
}

/// Validate an `Attribution-Reporting-Register-Source` header value.
///
/// `source_type` only affects expiry rounding: event sources round to whole
/// days. To pick the header kind and source type from a [`HeaderOptions`]
/// value, call [`validate_header`] instead.
pub fn validate_source(
    text: &str,
    flags: &Flags,
    source_type: Option<SourceType>,
) -> ValidationOutput {
    let object = match parse_or_reject(text) {
        Ok(object) => object,
        Err(output) => return output,
    };

    if !present(&object, "destination") && !present(&object, "web_destination") {
        return ValidationOutput::rejected(Diagnostic::error(
            vec!["destination or web_destination".to_string()],
            "at least one field must be present and non-null",
        ));
    }

    let mut ctx = Context::new(flags, HeaderOptions::source(source_type));
    ctx.expected = source_defaults(flags);
    if flags.attribution_scopes {
        ctx.scratch.max_event_states_present = object.contains_key("max_event_states");
        ctx.scratch.attribution_scope_limit_present =
            object.contains_key("attribution_scope_limit");
    }
    run(&mut ctx, &object, &source_table(flags))
}

/// Validate an `Attribution-Reporting-Register-Trigger` header value.
/// Equivalent to [`validate_header`] with [`HeaderOptions::trigger`].
pub fn validate_trigger(text: &str, flags: &Flags) -> ValidationOutput {
    let object = match parse_or_reject(text) {
        Ok(object) => object,
        Err(output) => return output,
    };
    let mut ctx = Context::new(flags, HeaderOptions::trigger());
    ctx.expected = trigger_defaults(flags);
    run(&mut ctx, &object, &trigger_table(flags))
}

/// Validate the redirect headers of a registration response, given as one
/// JSON object keyed by header name. Equivalent to [`validate_header`] with
/// [`HeaderOptions::redirect`].
pub fn validate_redirect(text: &str, flags: &Flags) -> ValidationOutput {
    let object = match parse_or_reject(text) {
        Ok(object) => object,
        Err(output) => return output,
    };
    let mut ctx = Context::new(flags, HeaderOptions::redirect());
    ctx.expected = redirect_defaults();
    run(&mut ctx, &object, &redirect_table())
}

/// Dispatch on [`HeaderOptions::header_type`].
pub fn validate_header(text: &str, flags: &Flags, options: HeaderOptions) -> ValidationOutput {
    match options.header_type {
        HeaderType::Source => validate_source(text, flags, options.source_type),
        HeaderType::Trigger => validate_trigger(text, flags),
        HeaderType::Redirect => validate_redirect(text, flags),
    }
}
