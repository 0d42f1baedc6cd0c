// Flattened input values

use rulebook_files::UploadedFile;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A single value at a flattened attribute path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlatValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    File(UploadedFile),
}

impl FlatValue {
    /// Whether the value counts as "nothing sent".
    ///
    /// Null and the empty string are empty; numbers, booleans and files
    /// never are.
    pub fn is_empty(&self) -> bool {
        match self {
            FlatValue::Null => true,
            FlatValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The textual value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlatValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The uploaded file, if this is one.
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FlatValue::File(f) => Some(f),
            _ => None,
        }
    }

    /// The value of a number. Text is not converted.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlatValue::Integer(n) => Some(*n as f64),
            FlatValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the value is a number or text that reads as one.
    pub fn is_numeric(&self) -> bool {
        match self {
            FlatValue::Integer(_) => true,
            FlatValue::Float(n) => n.is_finite(),
            FlatValue::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        }
    }
}

impl From<&Value> for FlatValue {
    /// Convert a JSON scalar. Collections are flattened before they get
    /// here and map to `Null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => FlatValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FlatValue::Integer(i),
                None => FlatValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FlatValue::Text(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => FlatValue::Null,
        }
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        FlatValue::Text(value.to_string())
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        FlatValue::Text(value)
    }
}

impl From<i64> for FlatValue {
    fn from(value: i64) -> Self {
        FlatValue::Integer(value)
    }
}

impl From<UploadedFile> for FlatValue {
    fn from(value: UploadedFile) -> Self {
        FlatValue::File(value)
    }
}

impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatValue::Null => Ok(()),
            FlatValue::Bool(b) => write!(f, "{}", b),
            FlatValue::Integer(n) => write!(f, "{}", n),
            FlatValue::Float(n) => write!(f, "{}", n),
            FlatValue::Text(s) => write!(f, "{}", s),
            FlatValue::File(file) => write!(f, "{}", file.original_name()),
        }
    }
}
