use ara_headers::{Flags, HeaderOptions, HeaderType, SourceType, validate_header};
use std::path::PathBuf;

pub fn fixtures_dir() -> PathBuf {
    std::env::var("ARA_HEADERS_FIXTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// A single header case from a fixture suite.
#[derive(Debug, serde::Deserialize)]
pub struct TestCase {
    pub name: String,
    pub id: String,
    pub header: HeaderType,
    #[serde(default)]
    pub source_type: Option<SourceType>,
    /// Flag overrides; unset flags keep their defaults.
    #[serde(default)]
    pub flags: Option<Flags>,
    pub input: String,
    pub expected: Expected,
}

#[derive(Debug, serde::Deserialize)]
pub struct Expected {
    #[serde(default)]
    pub valid: Option<bool>,
    /// When present, the exact ordered list of errors.
    #[serde(default)]
    pub errors: Option<Vec<ExpectedDiagnostic>>,
    /// When present, the exact ordered list of warnings.
    #[serde(default)]
    pub warnings: Option<Vec<ExpectedDiagnostic>>,
    /// Keys that must appear in the canonical document with these values.
    #[serde(default)]
    pub expected_value: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ExpectedDiagnostic {
    /// Path segments joined with `,`.
    pub path: String,
    pub message: String,
}

fn diagnostics_match(actual: &[ara_headers::Diagnostic], expected: &[ExpectedDiagnostic]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.path.join(",") == e.path && a.message == e.message)
}

/// Run every case of `tests/fixtures/<suite>` and fail if any case fails.
pub fn run_suite(suite: &str) {
    let suite_path = fixtures_dir().join(suite);
    assert!(
        suite_path.exists(),
        "Fixture suite not found: {:?}",
        suite_path
    );

    let content = std::fs::read_to_string(&suite_path).unwrap();
    let cases: Vec<TestCase> = serde_saphyr::from_str(&content).unwrap();

    let mut passed = 0;
    let mut failed = 0;

    for case in &cases {
        let flags = case.flags.clone().unwrap_or_default();
        let options = HeaderOptions {
            header_type: case.header,
            source_type: case.source_type,
        };
        let output = validate_header(&case.input, &flags, options);
        let mut case_ok = true;

        if let Some(valid) = case.expected.valid
            && output.is_valid() != valid
        {
            eprintln!(
                "  FAIL [{}] {}: expected valid={} but got {} errors",
                case.id,
                case.name,
                valid,
                output.errors.len()
            );
            for err in &output.errors {
                eprintln!("    - {}", err);
            }
            case_ok = false;
        }

        if let Some(expected_errors) = &case.expected.errors
            && !diagnostics_match(&output.errors, expected_errors)
        {
            eprintln!("  FAIL [{}] {}: error mismatch", case.id, case.name);
            eprintln!("    Expected: {:?}", expected_errors);
            eprintln!("    Actual:");
            for err in &output.errors {
                eprintln!("      - {}", err);
            }
            case_ok = false;
        }

        if let Some(expected_warnings) = &case.expected.warnings
            && !diagnostics_match(&output.warnings, expected_warnings)
        {
            eprintln!("  FAIL [{}] {}: warning mismatch", case.id, case.name);
            eprintln!("    Expected: {:?}", expected_warnings);
            for w in &output.warnings {
                eprintln!("      - {}", w);
            }
            case_ok = false;
        }

        if let Some(expected_value) = &case.expected.expected_value {
            for (key, want) in expected_value {
                match output.expected_value.get(key) {
                    Some(got) if values_structurally_equal(got, want) => {}
                    got => {
                        eprintln!(
                            "  FAIL [{}] {}: expected_value[{}] = {:?}, want {}",
                            case.id, case.name, key, got, want
                        );
                        case_ok = false;
                    }
                }
            }
        }

        if case_ok {
            passed += 1;
        } else {
            failed += 1;
        }
    }

    eprintln!(
        "\n{}: {} passed, {} failed out of {} total",
        suite,
        passed,
        failed,
        cases.len()
    );
    assert!(passed > 0, "No cases in {} were tested", suite);
    assert_eq!(failed, 0, "{} case(s) in {} failed", failed, suite);
}

/// Deep equality that compares numbers by value, so `1234` read from YAML
/// equals `1234` produced as an unsigned canonical value.
pub fn values_structurally_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a == b
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a == b
            } else {
                a.as_f64() == b.as_f64()
            }
        }
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(a, b)| values_structurally_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && b.iter().all(|(key, val_b)| {
                    a.get(key)
                        .is_some_and(|val_a| values_structurally_equal(val_a, val_b))
                })
        }
        _ => false,
    }
}
