//! Validation and canonicalization of Attribution Reporting registration
//! headers.
//!
//! A registration response carries JSON-valued headers describing an
//! attributable event (`source`), a conversion (`trigger`) or follow-up
//! registrations (`redirect`). This crate checks such a header against the
//! limits and feature toggles of the reporting client and produces the
//! canonical document the client would store:
//!
//! ```text
//! text → parse → fold keys → field table walk → ValidationOutput
//!                                               { errors, warnings, expected_value }
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use ara_headers::{Flags, validate_source};
//!
//! let output = validate_source(
//!     r#"{"destination": "android-app://com.myapps", "source_event_id": "1234"}"#,
//!     &Flags::default(),
//!     None,
//! );
//! assert!(output.is_valid());
//! assert_eq!(output.expected_value["source_event_id"], 1234);
//! assert_eq!(output.expected_value["trigger_data_matching"], "MODULUS");
//! ```
//!
//! # Configuration
//!
//! [`Flags`] carries every limit and feature toggle. Defaults match the
//! reporting client; overrides load from YAML or JSON:
//!
//! ```rust
//! let flags = ara_headers::Flags::from_yaml("feature-attribution-scopes: true").unwrap();
//! assert!(flags.attribution_scopes);
//! ```

pub mod combinators;
pub mod config;
pub mod context;
pub mod enums;
pub mod error;
pub mod filters;
pub mod parse;
pub mod primitives;
pub mod rules;
pub mod serialize;
pub mod state;
pub mod validate;

pub use config::{Flags, HeaderOptions};
pub use enums::{HeaderType, RedirectBehavior, SourceType};
pub use error::*;

// Re-export entry-point functions at the crate root for convenience.
pub use parse::parse;
pub use serialize::{to_pretty_json, to_yaml};
pub use validate::{validate_header, validate_redirect, validate_source, validate_trigger};

use serde_json::{Map, Value};

/// Result of the [`canonicalize`] convenience entry point.
#[derive(Clone, Debug)]
pub struct CanonicalHeader {
    /// The canonical document.
    pub expected_value: Map<String, Value>,
    /// Non-fatal warnings produced during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Convenience entry point composing parse → validate.
///
/// Returns the canonical document and any warnings on success. The document
/// is only handed out when validation found no errors.
///
/// # Errors
///
/// Returns every error diagnostic (parse or validation) on failure.
///
/// # Example
///
/// ```rust
/// use ara_headers::{Flags, HeaderOptions, canonicalize};
///
/// let header = r#"{"event_trigger_data": [{"trigger_data": "2"}]}"#;
/// match canonicalize(header, &Flags::default(), HeaderOptions::trigger()) {
///     Ok(canonical) => println!("{}", canonical.expected_value["event_trigger_data"]),
///     Err(errors) => eprintln!("{} errors", errors.len()),
/// }
/// ```
pub fn canonicalize(
    text: &str,
    flags: &Flags,
    options: HeaderOptions,
) -> Result<CanonicalHeader, Vec<Diagnostic>> {
    let output = validate::validate_header(text, flags, options);
    if !output.is_valid() {
        return Err(output.errors);
    }
    Ok(CanonicalHeader {
        expected_value: output.expected_value,
        warnings: output.warnings,
    })
}
