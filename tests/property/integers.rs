use ara_headers::primitives::{IntegerError, IntegerKind, parse_i32, parse_i64, parse_u64};
use ara_headers::{Flags, validate_source};
use proptest::prelude::*;

proptest! {
    #[test]
    fn every_u64_parses_back_exactly(n in any::<u64>()) {
        prop_assert_eq!(parse_u64(&n.to_string()), Ok(n));
    }

    #[test]
    fn every_i64_parses_back_exactly(n in any::<i64>()) {
        prop_assert_eq!(parse_i64(&n.to_string()), Ok(n));
    }

    #[test]
    fn values_past_u64_are_range_errors(extra in 1u128..=u128::from(u64::MAX)) {
        let text = (u128::from(u64::MAX) + extra).to_string();
        prop_assert_eq!(parse_u64(&text), Err(IntegerError::Range(IntegerKind::U64)));
    }

    #[test]
    fn i32_accepts_exactly_its_range(n in any::<i64>()) {
        let parsed = parse_i32(&n.to_string());
        match i32::try_from(n) {
            Ok(expected) => prop_assert_eq!(parsed, Ok(expected)),
            Err(_) => prop_assert_eq!(parsed, Err(IntegerError::Range(IntegerKind::I32))),
        }
    }

    #[test]
    fn non_digit_text_is_a_grammar_error(text in "[0-9]{0,5}[a-z +.][0-9]{0,5}") {
        prop_assert_eq!(parse_u64(&text), Err(IntegerError::Grammar(IntegerKind::U64)));
    }

    #[test]
    fn source_event_id_is_stored_exactly(n in any::<u64>()) {
        let body = format!(
            r#"{{"destination": "android-app://com.example.app", "source_event_id": "{}"}}"#,
            n
        );
        let output = validate_source(&body, &Flags::default(), None);
        prop_assert!(output.is_valid());
        prop_assert_eq!(output.expected_value["source_event_id"].as_u64(), Some(n));
    }
}
