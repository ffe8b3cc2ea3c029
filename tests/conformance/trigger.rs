use super::common::run_suite;
use ara_headers::{Flags, validate_trigger};
use serde_json::{Value, json};

#[test]
fn trigger_suite() {
    run_suite("trigger.yaml");
}

/// Decode a field stored as compact JSON text.
fn stored(output: &ara_headers::ValidationOutput, key: &str) -> Value {
    let text = output.expected_value[key]
        .as_str()
        .unwrap_or_else(|| panic!("{} is not stored as text", key));
    serde_json::from_str(text).unwrap()
}

#[test]
fn full_trigger_registration() {
    let body = r#"{
        "event_trigger_data": [{"trigger_data": "1", "priority": "100", "deduplication_key": "7"}],
        "aggregatable_trigger_data": [{"key_piece": "0x400", "source_keys": ["campaignCounts"]}],
        "aggregatable_values": {"campaignCounts": 32768},
        "aggregatable_deduplication_keys": [{"deduplication_key": "9"}],
        "filters": {"product": ["1234"]},
        "not_filters": {"product": ["5678"]},
        "debug_key": "42",
        "debug_reporting": true
    }"#;
    let output = validate_trigger(body, &Flags::default());
    assert!(output.is_valid(), "{:?}", output.errors);

    assert_eq!(
        stored(&output, "event_trigger_data"),
        json!([{"trigger_data": 1, "priority": 100, "deduplication_key": 7}])
    );
    assert_eq!(
        stored(&output, "aggregatable_values"),
        json!({"campaignCounts": 32768})
    );
    assert_eq!(stored(&output, "filters"), json!([{"product": ["1234"]}]));
    assert_eq!(stored(&output, "not_filters"), json!([{"product": ["5678"]}]));
    assert_eq!(output.expected_value["debug_key"], 42);
    assert_eq!(output.expected_value["debug_reporting"], true);
}

#[test]
fn trigger_data_accepts_the_full_unsigned_range() {
    let output = validate_trigger(
        r#"{"event_trigger_data": [{"trigger_data": "18446744073709551615"}]}"#,
        &Flags::default(),
    );
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(
        output.expected_value["event_trigger_data"],
        r#"[{"trigger_data":18446744073709551615}]"#
    );
}

#[test]
fn integral_float_value_is_written_as_an_integer() {
    let output = validate_trigger(
        r#"{"event_trigger_data": [{"value": 5.0}]}"#,
        &Flags::default(),
    );
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(
        output.expected_value["event_trigger_data"],
        r#"[{"trigger_data":0,"value":5}]"#
    );
}

#[test]
fn header_limit_feature_lifts_the_source_keys_limit() {
    let flags = Flags {
        max_aggregate_keys_per_trigger_registration: 1,
        enable_update_trigger_header_limit: true,
        ..Flags::default()
    };
    let body = r#"{"aggregatable_trigger_data": [{"key_piece": "0x1", "source_keys": ["a", "b"]}]}"#;
    let output = validate_trigger(body, &flags);
    assert!(output.is_valid(), "{:?}", output.errors);
}

#[test]
fn registration_time_gates_context_id_only_when_included() {
    let output = validate_trigger(
        r#"{"aggregatable_source_registration_time": "exclude", "trigger_context_id": "ctx"}"#,
        &Flags::default(),
    );
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(output.expected_value["trigger_context_id"], "ctx");
}

#[test]
fn disabled_features_keep_defaults() {
    let flags = Flags {
        aggregation_coordinator_origin: false,
        trigger_context_id: false,
        ..Flags::default()
    };
    let output = validate_trigger(
        r#"{"aggregation_coordinator_origin": 5, "trigger_context_id": 5}"#,
        &flags,
    );
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(output.expected_value["aggregation_coordinator_origin"], Value::Null);
    assert_eq!(output.expected_value["trigger_context_id"], Value::Null);
}
