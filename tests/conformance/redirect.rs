use super::common::run_suite;
use ara_headers::rules::redirect::well_known_url;
use ara_headers::{Flags, validate_redirect};

#[test]
fn redirect_suite() {
    run_suite("redirect.yaml");
}

#[test]
fn well_known_url_encodes_the_original_location() {
    assert_eq!(
        well_known_url("https://a.example/p?q=1&r=2"),
        "https://a.example/p?q=1&r=2/.well-known/attribution-reporting/register-redirect\
         ?302_url=https%3A%2F%2Fa.example%2Fp%3Fq%3D1%26r%3D2"
    );
}

#[test]
fn redirects_at_the_limit_do_not_warn() {
    let flags = Flags {
        max_registration_redirects: 2,
        ..Flags::default()
    };
    let output = validate_redirect(
        r#"{"attribution-reporting-redirect": ["https://a.example", "https://b.example"]}"#,
        &flags,
    );
    assert!(output.is_valid());
    assert!(output.warnings.is_empty());
}

#[test]
fn zero_redirect_limit_drops_everything() {
    let flags = Flags {
        max_registration_redirects: 0,
        ..Flags::default()
    };
    let output = validate_redirect(
        r#"{"attribution-reporting-redirect": [5]}"#,
        &flags,
    );
    assert!(output.is_valid());
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(
        output.expected_value["attribution-reporting-redirect"],
        serde_json::json!([])
    );
}
