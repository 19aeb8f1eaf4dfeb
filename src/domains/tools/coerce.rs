//! Lenient argument types.
//!
//! MCP clients routinely send booleans, numbers and lists as strings. Each
//! `Loose*` type accepts the native JSON shape or a string form, and converts
//! to the strict value with a field-specific [`ToolError`] on failure.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::{ErrorCode, ToolError};

const TRUE_VALUES: &[&str] = &["1", "true", "yes", "y", "on"];
const FALSE_VALUES: &[&str] = &["0", "false", "no", "n", "off"];

fn bool_token(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_lowercase();
    if TRUE_VALUES.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

// ============================================================================
// Booleans
// ============================================================================

/// A boolean or a boolean-like string (`yes`, `off`, `1`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseBool {
    Bool(bool),
    Text(String),
}

impl LooseBool {
    fn raw(&self) -> Value {
        match self {
            Self::Bool(value) => json!(value),
            Self::Text(value) => json!(value),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    pub fn parse(&self, field: &str) -> Result<bool, ToolError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::Text(text) => bool_token(text).ok_or_else(|| {
                ToolError::invalid_field(
                    ErrorCode::InvalidBoolean,
                    field,
                    self.raw(),
                    format!("{field} must be boolean-like."),
                )
            }),
        }
    }
}

/// Absent or blank maps to `None`.
pub fn optional_bool(value: Option<&LooseBool>, field: &str) -> Result<Option<bool>, ToolError> {
    match value {
        None => Ok(None),
        Some(value) if value.is_blank() => Ok(None),
        Some(value) => value.parse(field).map(Some),
    }
}

/// Absent maps to `default`; a blank string is an error.
pub fn bool_or(value: Option<&LooseBool>, field: &str, default: bool) -> Result<bool, ToolError> {
    value.map_or(Ok(default), |value| value.parse(field))
}

/// Auto-fit accepts boolean tokens plus `content`/`window` (on) and `fixed` (off).
pub fn optional_auto_fit(value: Option<&LooseBool>, field: &str) -> Result<Option<bool>, ToolError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value {
        LooseBool::Bool(on) => Ok(Some(*on)),
        LooseBool::Text(text) => {
            let normalized = text.trim().to_lowercase();
            if normalized.is_empty() {
                return Ok(None);
            }
            if let Some(on) = bool_token(&normalized) {
                return Ok(Some(on));
            }
            match normalized.as_str() {
                "content" | "window" => Ok(Some(true)),
                "fixed" => Ok(Some(false)),
                _ => Err(ToolError::invalid_field(
                    ErrorCode::InvalidAutoFit,
                    field,
                    value.raw(),
                    format!("{field} must be boolean-like or one of: content, window, fixed."),
                )),
            }
        }
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// An integer or a base-10 integer string. JSON booleans are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseInt {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl LooseInt {
    fn raw(&self) -> Value {
        match self {
            Self::Bool(value) => json!(value),
            Self::Int(value) => json!(value),
            Self::Text(value) => json!(value),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    pub fn parse(&self, field: &str) -> Result<i64, ToolError> {
        let invalid = || {
            ToolError::invalid_field(
                ErrorCode::InvalidInteger,
                field,
                self.raw(),
                format!("{field} must be an integer."),
            )
        };
        match self {
            Self::Bool(_) => Err(invalid()),
            Self::Int(value) => Ok(*value),
            Self::Text(text) => text.trim().parse().map_err(|_| invalid()),
        }
    }
}

pub fn optional_int(value: Option<&LooseInt>, field: &str) -> Result<Option<i64>, ToolError> {
    match value {
        None => Ok(None),
        Some(value) if value.is_blank() => Ok(None),
        Some(value) => value.parse(field).map(Some),
    }
}

pub fn int_or(value: Option<&LooseInt>, field: &str, default: i64) -> Result<i64, ToolError> {
    value.map_or(Ok(default), |value| value.parse(field))
}

/// A number or a numeric string. JSON booleans are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseNumber {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn raw(&self) -> Value {
        match self {
            Self::Bool(value) => json!(value),
            Self::Number(value) => json!(value),
            Self::Text(value) => json!(value),
        }
    }
}

/// Absent or blank maps to `None`.
pub fn optional_number(value: Option<&LooseNumber>, field: &str) -> Result<Option<f64>, ToolError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let invalid = || {
        ToolError::invalid_field(
            ErrorCode::InvalidNumber,
            field,
            value.raw(),
            format!("{field} must be numeric."),
        )
    };
    match value {
        LooseNumber::Bool(_) => Err(invalid()),
        LooseNumber::Number(number) => Ok(Some(*number)),
        LooseNumber::Text(text) => {
            let raw = text.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Some)
                .ok_or_else(invalid)
        }
    }
}

pub fn number_or(value: Option<&LooseNumber>, field: &str, default: f64) -> Result<f64, ToolError> {
    Ok(optional_number(value, field)?.unwrap_or(default))
}

// ============================================================================
// Lists
// ============================================================================

/// Paragraph indices: a JSON list, a JSON array string, or tokens separated
/// by whitespace, commas or semicolons.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseIndices {
    List(Vec<Value>),
    Text(String),
}

/// One list item as an index: integers, integer strings, booleans (0 or 1)
/// and finite floats truncated toward zero.
fn index_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(f64::trunc)
                .filter(|whole| (i64::MIN as f64..=i64::MAX as f64).contains(whole))
                .map(|whole| whole as i64)
        }),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl LooseIndices {
    fn raw(&self) -> Value {
        match self {
            Self::List(values) => json!(values),
            Self::Text(value) => json!(value),
        }
    }

    pub fn parse(&self, field: &str) -> Result<Vec<i64>, ToolError> {
        let invalid = |message: String| {
            ToolError::invalid_field(ErrorCode::InvalidParagraphIndices, field, self.raw(), message)
        };
        let from_values = |values: &[Value], message: String| {
            values
                .iter()
                .map(index_value)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid(message))
        };

        match self {
            Self::List(values) => {
                from_values(values.as_slice(), format!("{field} must be a list of integers."))
            }
            Self::Text(text) => {
                let raw = text.trim();
                if raw.is_empty() {
                    return Ok(Vec::new());
                }
                if raw.starts_with('[') {
                    let parsed: Value = serde_json::from_str(raw)
                        .map_err(|_| invalid(format!("{field} JSON string is invalid.")))?;
                    let Value::Array(values) = parsed else {
                        return Err(invalid(format!("{field} JSON must be a list.")));
                    };
                    return from_values(values.as_slice(), format!("{field} JSON must contain integers only."));
                }
                raw.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
                    .filter(|token| !token.is_empty())
                    .map(|token| token.parse::<i64>().ok())
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid(format!("{field} string must contain integers only.")))
            }
        }
    }
}

fn cell_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A 2-D string matrix: nested lists, a JSON string, or one row per line with
/// tab- or comma-separated cells.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseMatrix {
    Rows(Vec<Value>),
    Text(String),
}

impl LooseMatrix {
    fn raw(&self) -> Value {
        match self {
            Self::Rows(rows) => json!(rows),
            Self::Text(value) => json!(value),
        }
    }

    fn rows_of(&self, rows: &[Value], field: &str, message: String) -> Result<Vec<Vec<String>>, ToolError> {
        rows.iter()
            .map(|row| match row {
                Value::Array(cells) => Ok(cells.iter().map(cell_string).collect()),
                _ => Err(ToolError::invalid_field(
                    ErrorCode::InvalidMatrix,
                    field,
                    self.raw(),
                    message.clone(),
                )),
            })
            .collect()
    }

    /// Blank strings map to `None`.
    pub fn parse(&self, field: &str) -> Result<Option<Vec<Vec<String>>>, ToolError> {
        match self {
            Self::Rows(rows) => self
                .rows_of(rows, field, format!("{field} must be a 2D list."))
                .map(Some),
            Self::Text(text) => {
                let raw = text.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                if raw.starts_with('[') {
                    let parsed: Value = serde_json::from_str(raw).map_err(|_| {
                        ToolError::invalid_field(
                            ErrorCode::InvalidMatrix,
                            field,
                            self.raw(),
                            format!("{field} JSON string is invalid."),
                        )
                    })?;
                    let message = format!("{field} JSON must be a 2D list.");
                    let Value::Array(rows) = parsed else {
                        return Err(ToolError::invalid_field(
                            ErrorCode::InvalidMatrix,
                            field,
                            self.raw(),
                            message,
                        ));
                    };
                    return self.rows_of(&rows, field, message).map(Some);
                }
                let rows = raw
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| {
                        let separator = if line.contains('\t') { '\t' } else { ',' };
                        line.split(separator).map(|cell| cell.trim().to_string()).collect()
                    })
                    .collect();
                Ok(Some(rows))
            }
        }
    }
}

/// A list of strings: a JSON list, a JSON array string, or comma-separated text.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LooseStringList {
    List(Vec<Value>),
    Text(String),
}

impl LooseStringList {
    fn raw(&self) -> Value {
        match self {
            Self::List(values) => json!(values),
            Self::Text(value) => json!(value),
        }
    }

    /// Blank strings map to `None`; blank list items are dropped.
    pub fn parse(&self, field: &str) -> Result<Option<Vec<String>>, ToolError> {
        let non_blank = |values: &[Value]| -> Vec<String> {
            values
                .iter()
                .map(cell_string)
                .filter(|item| !item.trim().is_empty())
                .collect()
        };
        match self {
            Self::List(values) => Ok(Some(non_blank(values.as_slice()))),
            Self::Text(text) => {
                let raw = text.trim();
                if raw.is_empty() {
                    return Ok(None);
                }
                if raw.starts_with('[') {
                    let invalid = |message: String| {
                        ToolError::invalid_field(ErrorCode::InvalidShading, field, self.raw(), message)
                    };
                    let parsed: Value = serde_json::from_str(raw)
                        .map_err(|_| invalid(format!("{field} JSON string is invalid.")))?;
                    let Value::Array(values) = parsed else {
                        return Err(invalid(format!("{field} JSON must be a list.")));
                    };
                    return Ok(Some(non_blank(values.as_slice())));
                }
                Ok(Some(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect(),
                ))
            }
        }
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Validate a six-digit RGB hex color (optional `#`), returning it uppercased.
pub fn normalize_color(value: &str, field: &str) -> Result<String, ToolError> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(hex.to_uppercase())
    } else {
        Err(ToolError::invalid_field(
            ErrorCode::InvalidColor,
            field,
            value,
            "Color must be a 6-char hex RGB value, e.g. '000000' or '#1A2B3C'.",
        ))
    }
}

/// Optional color; absent or blank maps to `None`.
pub fn optional_color(value: Option<&str>, field: &str) -> Result<Option<String>, ToolError> {
    match value {
        Some(value) if !value.trim().is_empty() => normalize_color(value, field).map(Some),
        _ => Ok(None),
    }
}
