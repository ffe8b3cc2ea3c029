//! The mutable workspace threaded through every field rule of one
//! validation call.

use crate::config::{Flags, HeaderOptions};
use serde_json::{Map, Value};

/// Values derived by earlier rules and read by later ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scratch {
    /// `_lookback_window` may appear in the filter maps being checked.
    pub can_include_lookback_window: bool,
    /// Filter keys are checked against the per-string byte limit.
    pub should_check_filter_size: bool,
    pub attribution_scope_limit_value: Option<i64>,
    pub attribution_scope_limit_present: bool,
    pub max_event_states_present: bool,
    /// Upper-cased `aggregatable_source_registration_time`, once validated.
    pub aggregatable_source_registration_time: Option<String>,
    /// Canonical event report window in milliseconds.
    pub effective_expiry: Option<u64>,
}

/// Per-call context. Never share one instance between two validations.
#[derive(Clone, Debug)]
pub struct Context {
    pub flags: Flags,
    pub header: HeaderOptions,
    pub scratch: Scratch,
    pub expected: Map<String, Value>,
}

impl Context {
    pub fn new(flags: &Flags, header: HeaderOptions) -> Self {
        Self {
            flags: flags.clone(),
            header,
            scratch: Scratch::default(),
            expected: Map::new(),
        }
    }

    /// Write a canonical value, replacing the default for that key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.expected.insert(key.to_string(), value.into());
    }

    pub fn expected_u64(&self, key: &str) -> Option<u64> {
        self.expected.get(key).and_then(Value::as_u64)
    }

    pub fn expected_str(&self, key: &str) -> Option<&str> {
        self.expected.get(key).and_then(Value::as_str)
    }

    /// Configure the filter validator for a trigger-level filter field.
    pub(crate) fn enter_trigger_filters(&mut self) {
        self.scratch.can_include_lookback_window = true;
        self.scratch.should_check_filter_size = self.flags.trigger_size_checks();
    }

    /// Configure the filter validator for source-level `filter_data`.
    pub(crate) fn enter_source_filters(&mut self) {
        self.scratch.can_include_lookback_window = false;
        self.scratch.should_check_filter_size = true;
    }
}
