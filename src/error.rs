use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A message recorded while validating a header, tagged with the field path
/// that was active when it was recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub path: Vec<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            path,
            message: message.into(),
        }
    }

    pub fn warning(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            path,
            message: message.into(),
        }
    }

    /// Renders the message as ``<message>: `<path>` `` with path segments
    /// joined by commas. An empty path renders the bare message.
    pub fn formatted(&self) -> String {
        if self.path.is_empty() {
            self.message.clone()
        } else {
            format!("{}: `{}`", self.message, self.path.join(","))
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Error kind for parse failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    Syntax,
    UnexpectedEof,
    NotAnObject,
}

/// Produced by `parse` when the header body is not a JSON object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "{}:{}: {}", line, col, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ParseError {}

/// Result of validating one header: errors, warnings and the canonical
/// document.
///
/// `expected_value` is only trustworthy when `errors` is empty. Fields
/// validated after a failure may have written partial values.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationOutput {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub expected_value: Map<String, Value>,
}

impl ValidationOutput {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Output for a body that could not be parsed: one error, no canonical
    /// document.
    pub(crate) fn rejected(error: Diagnostic) -> Self {
        Self {
            errors: vec![error],
            warnings: Vec::new(),
            expected_value: Map::new(),
        }
    }
}

/// Serialization error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializeError {
    pub message: String,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SerializeError {}

/// Failure to load a flag configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Yaml(String),
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Yaml(msg) => write!(f, "invalid YAML flag configuration: {}", msg),
            ConfigError::Json(msg) => write!(f, "invalid JSON flag configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
