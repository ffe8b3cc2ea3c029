use ara_headers::primitives::{
    IntegerError, IntegerKind, check_integer, clamp_seconds, encode_uri_component, exceeds,
    number_to_string, parse_i32, parse_i64, parse_u32, parse_u64, quoted, round_to_multiple,
    stringify, to_list, utf16_len, utf8_len,
};
use ara_headers::serialize::canonical_json;
use ara_headers::enums::JsonKind;
use serde_json::json;

// ─── Checked integers ───────────────────────────────────────────────────────

#[test]
fn unsigned_grammar_rejects_signs_and_spaces() {
    for text in ["-1", "+1", " 1", "1 ", "", "0x1", "1.0", "1e3"] {
        assert_eq!(
            parse_u64(text),
            Err(IntegerError::Grammar(IntegerKind::U64)),
            "{:?}",
            text
        );
    }
}

#[test]
fn signed_grammar_accepts_one_leading_minus() {
    assert_eq!(parse_i64("-0"), Ok(0));
    assert_eq!(parse_i64("-42"), Ok(-42));
    assert_eq!(
        parse_i64("--1"),
        Err(IntegerError::Grammar(IntegerKind::I64))
    );
}

#[test]
fn bounds_are_exact() {
    assert_eq!(parse_u64("18446744073709551615"), Ok(u64::MAX));
    assert_eq!(
        parse_u64("18446744073709551616"),
        Err(IntegerError::Range(IntegerKind::U64))
    );
    assert_eq!(parse_i64("-9223372036854775808"), Ok(i64::MIN));
    assert_eq!(
        parse_i64("9223372036854775808"),
        Err(IntegerError::Range(IntegerKind::I64))
    );
    assert_eq!(parse_u32("4294967295"), Ok(u32::MAX));
    assert_eq!(
        parse_i32("2147483648"),
        Err(IntegerError::Range(IntegerKind::I32))
    );
}

#[test]
fn leading_zeros_and_long_inputs() {
    assert_eq!(parse_u64("000000000000000000000000000000000000000000007"), Ok(7));
    let long = "9".repeat(60);
    assert_eq!(
        check_integer(&long, IntegerKind::I64),
        Err(IntegerError::Range(IntegerKind::I64))
    );
}

#[test]
fn integer_error_messages() {
    assert_eq!(
        IntegerError::Grammar(IntegerKind::U64).to_string(),
        "must be an uint64 (must match /^[0-9]+$/)"
    );
    assert_eq!(
        IntegerError::Grammar(IntegerKind::I64).to_string(),
        "must be an int64 (must match /^-?[0-9]+$/)"
    );
    assert_eq!(
        IntegerError::Range(IntegerKind::I32).to_string(),
        "must fit in a signed 32-bit integer"
    );
}

// ─── Strings ────────────────────────────────────────────────────────────────

#[test]
fn quoted_prefixes() {
    assert_eq!(quoted("value"), "'value' ");
    assert_eq!(quoted(" 'value' "), "'value' ");
    assert_eq!(quoted(""), "");
}

#[test]
fn lengths_count_different_units() {
    assert_eq!(utf8_len("é"), 2);
    assert_eq!(utf16_len("é"), 1);
    assert_eq!(utf16_len("😀"), 2);
    assert_eq!(utf8_len("😀"), 4);
}

#[test]
fn exceeds_is_strict() {
    assert!(!exceeds(3, 3));
    assert!(exceeds(4, 3));
    assert!(exceeds(1, 0));
}

// ─── JSON coercion ──────────────────────────────────────────────────────────

#[test]
fn stringify_reads_values_as_text() {
    assert_eq!(stringify(&json!("abc")), "abc");
    assert_eq!(stringify(&json!(12)), "12");
    assert_eq!(stringify(&json!(-3)), "-3");
    assert_eq!(stringify(&json!(5.0)), "5");
    assert_eq!(stringify(&json!(1.5)), "1.5");
    assert_eq!(stringify(&json!(true)), "true");
    assert_eq!(stringify(&json!(null)), "null");
    assert_eq!(stringify(&json!([1, "a", null])), "1,a,");
    assert_eq!(stringify(&json!({"a": 1})), "[object Object]");
    assert_eq!(stringify(&json!(u64::MAX)), "18446744073709551615");
}

#[test]
fn number_to_string_switches_to_exponents_outside_plain_range() {
    assert_eq!(number_to_string(5.0), "5");
    assert_eq!(number_to_string(1.5), "1.5");
    assert_eq!(number_to_string(123.456), "123.456");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(1e16), "10000000000000000");
    assert_eq!(number_to_string(1e20), "100000000000000000000");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(1.5e25), "1.5e+25");
    assert_eq!(number_to_string(1e-6), "0.000001");
    assert_eq!(number_to_string(1.25e-5), "0.0000125");
    assert_eq!(number_to_string(1e-7), "1e-7");
    assert_eq!(number_to_string(-1e-7), "-1e-7");
    assert_eq!(number_to_string(-2.5e-8), "-2.5e-8");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn stringify_large_and_small_floats() {
    assert_eq!(stringify(&json!(1e16)), "10000000000000000");
    assert_eq!(stringify(&json!(1e21)), "1e+21");
    assert_eq!(stringify(&json!(1e-7)), "1e-7");
    assert_eq!(stringify(&json!([0.5, 1e21])), "0.5,1e+21");
}

#[test]
fn canonical_json_writes_floats_in_client_notation() {
    let value = json!({"a": [1e16, 1.5e25, 5.0, 0.25, 1e-7], "b": u64::MAX, "c": -3});
    assert_eq!(
        canonical_json(&value).unwrap(),
        json!(r#"{"a":[10000000000000000,1.5e+25,5,0.25,1e-7],"b":18446744073709551615,"c":-3}"#)
    );
}

#[test]
fn to_list_wraps_matching_scalars() {
    assert_eq!(
        to_list(&json!("a"), Some(JsonKind::String)),
        Some(vec![json!("a")])
    );
    assert_eq!(to_list(&json!(1), Some(JsonKind::String)), None);
    assert_eq!(to_list(&json!([1, 2]), Some(JsonKind::String)), Some(vec![json!(1), json!(2)]));
    assert_eq!(to_list(&json!(null), None), None);
    assert_eq!(to_list(&json!(true), None), Some(vec![json!(true)]));
}

// ─── Windows ────────────────────────────────────────────────────────────────

#[test]
fn clamp_seconds_bounds() {
    assert_eq!(clamp_seconds(-5, 0, 10), 0);
    assert_eq!(clamp_seconds(5, 0, 10), 5);
    assert_eq!(clamp_seconds(50, 0, 10), 10);
    assert_eq!(clamp_seconds(5, 8, 2), 8);
}

#[test]
fn round_to_multiple_cases() {
    const DAY: u64 = 86_400;
    assert_eq!(round_to_multiple(DAY, DAY), DAY);
    assert_eq!(round_to_multiple(DAY + DAY / 2, DAY), 2 * DAY);
    assert_eq!(round_to_multiple(DAY + DAY / 2 - 1, DAY), DAY);
    assert_eq!(round_to_multiple(3_600, DAY), DAY);
    assert_eq!(round_to_multiple(0, DAY), DAY);
    assert_eq!(round_to_multiple(7, 0), 7);
}

// ─── URLs ───────────────────────────────────────────────────────────────────

#[test]
fn encode_uri_component_keeps_unreserved_marks() {
    assert_eq!(encode_uri_component("AZaz09-_.!~*'()"), "AZaz09-_.!~*'()");
    assert_eq!(
        encode_uri_component("https://a.b/c?d=e&f"),
        "https%3A%2F%2Fa.b%2Fc%3Fd%3De%26f"
    );
    assert_eq!(encode_uri_component(" é"), "%20%C3%A9");
}

#[test]
fn encode_uri_component_escapes_reserved_and_astral() {
    assert_eq!(
        encode_uri_component("#$&+,/:;=?@[]"),
        "%23%24%26%2B%2C%2F%3A%3B%3D%3F%40%5B%5D"
    );
    assert_eq!(encode_uri_component("a\u{7f}😀"), "a%7F%F0%9F%98%80");
}
