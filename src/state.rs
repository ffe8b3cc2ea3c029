//! Path-tracking error and warning sink.

use crate::context::Context;
use crate::error::Diagnostic;
use serde_json::{Map, Value};

/// Outcome of one rule. `Err` carries the message for the first failed
/// check; the rule stops there.
pub type Check<T = ()> = Result<T, String>;

/// A validator for one top-level field: receives the field name and the
/// whole (key-folded) header object.
pub type FieldCheck = Box<dyn Fn(&mut ValidationState, &mut Context, &str, &Map<String, Value>)>;

/// Ordered field → validator table. Entries run in declaration order, so a
/// field that reads another field's canonical value must be pushed after it.
#[derive(Default)]
pub struct FieldTable {
    entries: Vec<(&'static str, FieldCheck)>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(&mut self, key: &'static str, check: F)
    where
        F: Fn(&mut ValidationState, &mut Context, &str, &Map<String, Value>) + 'static,
    {
        self.entries.push((key, Box::new(check)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }
}

/// Collects diagnostics for one validation call.
#[derive(Debug, Default)]
pub struct ValidationState {
    path: Vec<String>,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(Diagnostic::error(self.path.clone(), message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(Diagnostic::warning(self.path.clone(), message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Run `f` with `segment` appended to the path. The segment is popped
    /// when `f` returns, whatever it returns.
    pub fn scope<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    /// Walk `table` in its declared order against `object`.
    pub fn validate(
        &mut self,
        ctx: &mut Context,
        object: &Map<String, Value>,
        table: &FieldTable,
    ) {
        for (key, check) in &table.entries {
            let key: &str = key;
            tracing::trace!(field = key, "checking field");
            self.scope(key, |state| check(state, ctx, key, object));
        }
    }

    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.errors, self.warnings)
    }
}
