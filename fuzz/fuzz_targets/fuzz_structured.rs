#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use ara_headers::{Flags, validate_redirect, validate_source, validate_trigger};
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

const FIELDS: &[&str] = &[
    "destination",
    "web_destination",
    "source_event_id",
    "expiry",
    "event_report_window",
    "aggregatable_report_window",
    "priority",
    "filter_data",
    "aggregation_keys",
    "attribution_scopes",
    "attribution_scope_limit",
    "max_event_states",
    "event_trigger_data",
    "aggregatable_trigger_data",
    "aggregatable_values",
    "aggregatable_deduplication_keys",
    "filters",
    "not_filters",
    "attribution_config",
    "x_network_key_mapping",
    "aggregatable_source_registration_time",
    "trigger_context_id",
    "location",
    "attribution-reporting-redirect",
    "attribution-reporting-redirect-config",
];

/// Generate a small JSON value, nesting at most `depth` levels.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Value> {
    let max = if depth == 0 { 4 } else { 6 };
    match u.int_in_range(0..=max)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(Value::from(i64::arbitrary(u)?)),
        3 => Ok(Value::from(u64::arbitrary(u)?)),
        4 => Ok(Value::String(String::arbitrary(u)?)),
        5 => {
            let len = u.int_in_range(0..=4)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Array(items))
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(u)?, arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Object(map))
        }
    }
}

fn arbitrary_header(u: &mut Unstructured<'_>) -> arbitrary::Result<String> {
    let mut header = Map::new();
    for field in FIELDS {
        if bool::arbitrary(u)? {
            header.insert((*field).to_string(), arbitrary_value(u, 3)?);
        }
    }
    Ok(Value::Object(header).to_string())
}

fn arbitrary_flags(u: &mut Unstructured<'_>) -> arbitrary::Result<Flags> {
    Ok(Flags {
        attribution_scopes: bool::arbitrary(u)?,
        lookback_window_filter: bool::arbitrary(u)?,
        enable_update_trigger_header_limit: bool::arbitrary(u)?,
        enable_reinstall_reattribution: bool::arbitrary(u)?,
        max_registration_redirects: u.int_in_range(0..=3)?,
        max_attribution_filters: u.int_in_range(0..=5)?,
        ..Flags::default()
    })
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let (Ok(flags), Ok(header)) = (arbitrary_flags(&mut u), arbitrary_header(&mut u)) else {
        return;
    };
    let _ = validate_source(&header, &flags, None);
    let _ = validate_trigger(&header, &flags);
    let _ = validate_redirect(&header, &flags);
});
