use super::common::run_suite;
use ara_headers::{Flags, SourceType, validate_source};

const APP: &str = "android-app://com.example.app";

#[test]
fn source_suite() {
    run_suite("source.yaml");
}

fn source(body: &str, source_type: Option<SourceType>) -> ara_headers::ValidationOutput {
    validate_source(body, &Flags::default(), source_type)
}

#[test]
fn event_source_expiry_rounds_to_whole_days() {
    let body = format!(r#"{{"destination": "{}", "expiry": "129600"}}"#, APP);

    let event = source(&body, Some(SourceType::Event));
    assert!(event.is_valid(), "{:?}", event.errors);
    assert_eq!(event.expected_value["expiry"], 172_800);
    assert_eq!(event.expected_value["aggregatable_report_window"], 172_800_000u64);

    let navigation = source(&body, Some(SourceType::Navigation));
    assert_eq!(navigation.expected_value["expiry"], 129_600);

    let untyped = source(&body, None);
    assert_eq!(untyped.expected_value["expiry"], 129_600);
}

#[test]
fn event_source_expiry_below_half_a_day_rounds_down() {
    let body = format!(r#"{{"destination": "{}", "expiry": "129599"}}"#, APP);
    let output = source(&body, Some(SourceType::Event));
    assert_eq!(output.expected_value["expiry"], 86_400);
}

#[test]
fn report_windows_are_bounded_by_expiry() {
    let body = format!(
        r#"{{"destination": "{}", "expiry": "86400", "event_report_window": "172800",
            "aggregatable_report_window": "10"}}"#,
        APP
    );
    let output = source(&body, None);
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(output.expected_value["event_report_window"], 86_400_000u64);
    assert_eq!(output.expected_value["aggregatable_report_window"], 3_600_000u64);
}

#[test]
fn report_window_without_expiry_uses_max_expiry() {
    let body = format!(r#"{{"destination": "{}", "event_report_window": 99999999}}"#, APP);
    let output = source(&body, None);
    assert_eq!(output.expected_value["event_report_window"], 2_592_000_000u64);
}

#[test]
fn source_event_id_accepts_the_full_unsigned_range() {
    let body = format!(
        r#"{{"destination": "{}", "source_event_id": "18446744073709551615"}}"#,
        APP
    );
    let output = source(&body, None);
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(output.expected_value["source_event_id"].as_u64(), Some(u64::MAX));

    let body = format!(
        r#"{{"destination": "{}", "source_event_id": "18446744073709551616"}}"#,
        APP
    );
    let output = source(&body, None);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].path, vec!["source_event_id".to_string()]);
    assert_eq!(
        output.errors[0].message,
        "must fit in an unsigned 64-bit integer"
    );
}

#[test]
fn priority_accepts_the_full_signed_range() {
    let body = format!(
        r#"{{"destination": "{}", "priority": "-9223372036854775808"}}"#,
        APP
    );
    let output = source(&body, None);
    assert_eq!(output.expected_value["priority"].as_i64(), Some(i64::MIN));
}

#[test]
fn web_destinations_are_reduced_to_sites() {
    let output = source(
        r#"{"web_destination": ["https://shop.example.com/cart?x=1", "https://SHOP.example.com."]}"#,
        None,
    );
    assert!(output.is_valid(), "{:?}", output.errors);
    assert_eq!(
        output.expected_value["web_destination"],
        serde_json::json!(["https://shop.example.com"])
    );
}

#[test]
fn errors_follow_field_order() {
    let body = format!(
        r#"{{"aggregation_keys": 1, "priority": 1, "destination": "{}", "source_event_id": "x"}}"#,
        APP
    );
    let output = source(&body, None);
    let paths: Vec<String> = output.errors.iter().map(|e| e.path.join(",")).collect();
    assert_eq!(paths, vec!["source_event_id", "priority", "aggregation_keys"]);
}
