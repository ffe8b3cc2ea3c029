//! Shared primitives: checked integer parsing, string measurement, JSON
//! scalar coercion and URL helpers.

use crate::enums::JsonKind;
use crate::state::Check;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

// ─── Cached regexes ─────────────────────────────────────────────────────────

const UNSIGNED_PATTERN: &str = r"^[0-9]+$";
const SIGNED_PATTERN: &str = r"^-?[0-9]+$";

static UNSIGNED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(UNSIGNED_PATTERN).unwrap());

static SIGNED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SIGNED_PATTERN).unwrap());

static HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());

static HOST_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_]+$").unwrap());

pub fn is_hex(text: &str) -> bool {
    HEX_RE.is_match(text)
}

pub fn is_host_label(text: &str) -> bool {
    HOST_LABEL_RE.is_match(text)
}

// ─── Checked integers ───────────────────────────────────────────────────────

/// Bit width and signedness of a checked integer field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerKind {
    U32,
    I32,
    U64,
    I64,
}

impl IntegerKind {
    pub fn name(&self) -> &'static str {
        match self {
            IntegerKind::U32 => "uint32",
            IntegerKind::I32 => "int32",
            IntegerKind::U64 => "uint64",
            IntegerKind::I64 => "int64",
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, IntegerKind::I32 | IntegerKind::I64)
    }

    /// Inclusive bounds. Wider than any native 64-bit type so that
    /// `2^64 - 1` and `-2^63` compare exactly.
    pub fn bounds(&self) -> (i128, i128) {
        match self {
            IntegerKind::U32 => (0, i128::from(u32::MAX)),
            IntegerKind::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            IntegerKind::U64 => (0, i128::from(u64::MAX)),
            IntegerKind::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
        }
    }

    fn pattern(&self) -> &'static str {
        if self.is_signed() {
            SIGNED_PATTERN
        } else {
            UNSIGNED_PATTERN
        }
    }

    fn range_description(&self) -> &'static str {
        match self {
            IntegerKind::U32 => "an unsigned 32-bit integer",
            IntegerKind::I32 => "a signed 32-bit integer",
            IntegerKind::U64 => "an unsigned 64-bit integer",
            IntegerKind::I64 => "a signed 64-bit integer",
        }
    }
}

/// Why a numeric string was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerError {
    /// The text is not made of (optionally signed) decimal digits.
    Grammar(IntegerKind),
    /// The digits parse but fall outside the kind's bounds.
    Range(IntegerKind),
}

impl fmt::Display for IntegerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerError::Grammar(kind) => write!(
                f,
                "must be an {} (must match /{}/)",
                kind.name(),
                kind.pattern()
            ),
            IntegerError::Range(kind) => write!(f, "must fit in {}", kind.range_description()),
        }
    }
}

impl std::error::Error for IntegerError {}

/// Match `text` against the grammar of `kind`, then range-check it exactly.
pub fn check_integer(text: &str, kind: IntegerKind) -> Result<i128, IntegerError> {
    let grammar = if kind.is_signed() {
        &*SIGNED_RE
    } else {
        &*UNSIGNED_RE
    };
    if !grammar.is_match(text) {
        return Err(IntegerError::Grammar(kind));
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = digits.trim_start_matches('0');
    // 38 digits always fit in an i128; longer runs exceed every bound.
    if digits.len() > 38 {
        return Err(IntegerError::Range(kind));
    }
    let magnitude: i128 = if digits.is_empty() {
        0
    } else {
        digits.parse().map_err(|_| IntegerError::Range(kind))?
    };
    let value = if negative { -magnitude } else { magnitude };

    let (min, max) = kind.bounds();
    if value < min || value > max {
        return Err(IntegerError::Range(kind));
    }
    Ok(value)
}

pub fn parse_u32(text: &str) -> Result<u32, IntegerError> {
    let value = check_integer(text, IntegerKind::U32)?;
    u32::try_from(value).map_err(|_| IntegerError::Range(IntegerKind::U32))
}

pub fn parse_i32(text: &str) -> Result<i32, IntegerError> {
    let value = check_integer(text, IntegerKind::I32)?;
    i32::try_from(value).map_err(|_| IntegerError::Range(IntegerKind::I32))
}

pub fn parse_u64(text: &str) -> Result<u64, IntegerError> {
    let value = check_integer(text, IntegerKind::U64)?;
    u64::try_from(value).map_err(|_| IntegerError::Range(IntegerKind::U64))
}

pub fn parse_i64(text: &str) -> Result<i64, IntegerError> {
    let value = check_integer(text, IntegerKind::I64)?;
    i64::try_from(value).map_err(|_| IntegerError::Range(IntegerKind::I64))
}

// ─── String measurement ─────────────────────────────────────────────────────

/// Size of `text` once UTF-8 encoded.
pub fn utf8_len(text: &str) -> usize {
    text.len()
}

/// Number of UTF-16 code units, the unit string lengths are counted in by
/// the reporting client.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// `len > limit`, comparing a count against a configured `u64` cap.
pub fn exceeds(len: usize, limit: u64) -> bool {
    u64::try_from(len).map_or(true, |len| len > limit)
}

/// Prefix a field name for embedding in a message: `key` → `'key' `.
/// An empty name yields an empty prefix.
pub fn quoted(field: &str) -> String {
    if field.is_empty() {
        return String::new();
    }
    let trimmed = field.trim();
    let mut out = String::with_capacity(trimmed.len() + 3);
    if !trimmed.starts_with('\'') {
        out.push('\'');
    }
    out.push_str(trimmed);
    if !trimmed.ends_with('\'') {
        out.push('\'');
    }
    out.push(' ');
    out
}

// ─── JSON coercion ──────────────────────────────────────────────────────────

/// Render a JSON value the way a loosely-typed header field is read as text:
/// strings unchanged, numbers as [`number_to_string`] writes them, arrays
/// joined with commas.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(number_to_string).unwrap_or_else(|| n.to_string())
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip text of a float in the reporting client's number
/// notation: plain digits for magnitudes in `[1e-6, 1e21)`, otherwise
/// `d.ddde±x`.
pub fn number_to_string(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits as `d[.ddd]e<exp>`.
    let exp_form = format!("{:e}", f.abs());
    let Some((mantissa, exponent)) = exp_form.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if f < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        out.push_str(int);
        out.push('.');
        out.push_str(frac);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-n) as usize));
        out.push_str(&digits);
    } else {
        let (lead, rest) = digits.split_at(1);
        out.push_str(lead);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        out.push('e');
        out.push(if n - 1 < 0 { '-' } else { '+' });
        out.push_str(&(n - 1).abs().to_string());
    }
    out
}

/// Normalize a value to a list: arrays pass through, a lone scalar of
/// `element` kind (or any non-null scalar when `element` is `None`) becomes
/// a one-element list. Anything else yields `None`.
pub fn to_list(value: &Value, element: Option<JsonKind>) -> Option<Vec<Value>> {
    match (value, element) {
        (Value::Array(items), _) => Some(items.clone()),
        (Value::Null, _) => None,
        (other, Some(kind)) => (JsonKind::of(other) == kind).then(|| vec![other.clone()]),
        (other, None) => Some(vec![other.clone()]),
    }
}

// ─── URLs ───────────────────────────────────────────────────────────────────

pub fn parse_url(text: &str) -> Check<Url> {
    Url::parse(text).map_err(|_| "invalid URL format".to_string())
}

/// Bytes `encodeURIComponent` escapes: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

// ─── Windows ────────────────────────────────────────────────────────────────

/// Clamp `value` into `[min, max]`. A lower bound wins over an upper bound
/// that sits below it.
pub fn clamp_seconds(value: i128, min: u64, max: u64) -> u64 {
    if value < i128::from(min) {
        min
    } else if value > i128::from(max) {
        max
    } else {
        u64::try_from(value).unwrap_or(max)
    }
}

/// Round `input` to a multiple of `base`: up when the remainder is at least
/// half of `base` or when `input` is below one `base`, down otherwise.
pub fn round_to_multiple(input: u64, base: u64) -> u64 {
    if base == 0 {
        return input;
    }
    let remainder = input % base;
    let round_up = u128::from(remainder) * 2 >= u128::from(base) || input == remainder;
    let floor = input - remainder;
    if round_up {
        floor.saturating_add(base)
    } else {
        floor
    }
}

/// Seconds → milliseconds, saturating.
pub fn to_millis(seconds: u64) -> u64 {
    seconds.saturating_mul(1000)
}
