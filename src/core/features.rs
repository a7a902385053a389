use crate::models::requests::json_type_name;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

/// Errors raised while turning payload values into model features
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("Missing required field: '{0}'")]
    MissingField(String),

    #[error("could not convert string to float for field '{field}': '{value}'")]
    InvalidFloat { field: String, value: String },

    #[error("invalid literal for int() for field '{field}': '{value}'")]
    InvalidInteger { field: String, value: String },

    #[error("cannot convert non-finite value {value} to integer for field '{field}'")]
    NonFiniteInteger { field: String, value: f64 },

    #[error("field '{field}' must be a number or numeric string, not {found}")]
    WrongType { field: String, found: &'static str },
}

/// Coerce a value the way `float()` does
///
/// Numbers pass through, booleans become 1/0 and strings are parsed after
/// trimming surrounding whitespace.
pub fn coerce_float(field: &str, value: &Value) -> Result<f64, FeatureError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| FeatureError::InvalidFloat {
            field: field.to_string(),
            value: n.to_string(),
        }),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => strip_digit_separators(s.trim())
            .and_then(|digits| digits.parse::<f64>().ok())
            .ok_or_else(|| FeatureError::InvalidFloat {
                field: field.to_string(),
                value: s.clone(),
            }),
        other => Err(FeatureError::WrongType {
            field: field.to_string(),
            found: json_type_name(other),
        }),
    }
}

/// Coerce a value the way `int()` does
///
/// Fractional numbers are truncated toward zero, strings must hold an
/// integer literal.
pub fn coerce_int(field: &str, value: &Value) -> Result<i64, FeatureError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n.as_f64().unwrap_or(f64::NAN);
            if f.is_finite() {
                Ok(f.trunc() as i64)
            } else {
                Err(FeatureError::NonFiniteInteger {
                    field: field.to_string(),
                    value: f,
                })
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => strip_digit_separators(s.trim())
            .and_then(|digits| digits.parse::<i64>().ok())
            .ok_or_else(|| FeatureError::InvalidInteger {
                field: field.to_string(),
                value: s.clone(),
            }),
        other => Err(FeatureError::WrongType {
            field: field.to_string(),
            found: json_type_name(other),
        }),
    }
}

/// Remove `_` digit separators ("1_200" -> "1200")
///
/// A separator must sit between two digits; any other underscore makes the
/// literal invalid.
fn strip_digit_separators(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('_') {
        return Some(Cow::Borrowed(s));
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        match (before, after) {
            (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => {}
            _ => return None,
        }
    }
    Some(Cow::Owned(out))
}

/// Map a two-state clinical observation to 0/1
///
/// Strings are matched case-insensitively against the known vocabulary and
/// unknown words map to 0. Anything else is read as an integer.
pub fn coerce_binary_category(field: &str, value: &Value) -> Result<i64, FeatureError> {
    match value {
        Value::String(s) => Ok(match s.to_lowercase().as_str() {
            "normal" | "present" | "yes" | "poor" => 1,
            "abnormal" | "notpresent" | "no" | "good" => 0,
            _ => 0,
        }),
        other => coerce_int(field, other),
    }
}

/// `"Male"` is 1, every other value is 0
pub fn encode_gender(value: &Value) -> i64 {
    i64::from(value.as_str() == Some("Male"))
}

/// Smoking history category code; unknown values fall back to "No Info"
pub fn encode_smoking_history(value: &Value) -> i64 {
    match value.as_str() {
        Some("never") => 0,
        Some("former") => 1,
        Some("current") => 2,
        _ => 3,
    }
}
