//! Field coercion and shared validators.
//!
//! Request payloads arrive as loosely typed JSON values; the helpers here turn
//! them into the column types with one consistent rule set for create and
//! update paths.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::ModelError;

pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 100.0;

/// Trimmed non-empty text, e.g. names and titles.
pub fn required_text(field: &str, raw: &str) -> Result<String, ModelError> {
    let v = raw.trim();
    if v.is_empty() {
        return Err(ModelError::validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

pub fn validate_email(raw: &str) -> Result<String, ModelError> {
    let v = raw.trim();
    if !EMAIL_RE.is_match(v) {
        return Err(ModelError::validation("email format invalid"));
    }
    Ok(v.to_string())
}

pub fn validate_positive(field: &str, v: i32) -> Result<i32, ModelError> {
    if v <= 0 {
        return Err(ModelError::validation(format!("{field} must be a positive integer")));
    }
    Ok(v)
}

pub fn validate_grade(g: f64) -> Result<f64, ModelError> {
    // NaN fails the range check
    if !(GRADE_MIN..=GRADE_MAX).contains(&g) {
        return Err(ModelError::validation("grade must be between 0 and 100"));
    }
    Ok(g)
}

/// String value; JSON null reads as empty text.
pub fn text(field: &str, v: &Value) -> Result<String, ModelError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(ModelError::validation(format!("{field} must be a string"))),
    }
}

/// Integer value from a JSON integer, a finite float (truncated) or a string
/// holding an integer.
pub fn integer(field: &str, v: &Value) -> Result<i32, ModelError> {
    let err = || ModelError::validation(format!("{field} must be an integer"));
    let wide = match v {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc())
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
                .ok_or_else(err)?,
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| err())?,
        _ => return Err(err()),
    };
    i32::try_from(wide).map_err(|_| err())
}

/// Grade value from a JSON number or a numeric string.
pub fn grade(v: &Value) -> Result<f64, ModelError> {
    let err = || ModelError::validation("grade must be numeric");
    let g = match v {
        Value::Number(n) => n.as_f64().ok_or_else(err)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| err())?,
        _ => return Err(err()),
    };
    validate_grade(g)
}
