//! Typed lookups into `serde_json::Value`.
//!
//! A missing field and a field of the wrong type are different failures, so
//! every accessor returns a `FieldError` that says which one happened.

use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field `{0}` is missing")]
    Missing(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("field `{field}` should be {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Name of the JSON type of `value`, for messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON equality where numbers compare by value, so `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub trait JsonExt {
    fn kind(&self) -> &'static str;
    fn field(&self, name: &str) -> Result<&Value, FieldError>;
    fn str_field(&self, name: &str) -> Result<&str, FieldError>;
    fn i64_field(&self, name: &str) -> Result<i64, FieldError>;
    fn array_field(&self, name: &str) -> Result<&Vec<Value>, FieldError>;
}

impl JsonExt for Value {
    fn kind(&self) -> &'static str {
        kind(self)
    }

    fn field(&self, name: &str) -> Result<&Value, FieldError> {
        let object = self
            .as_object()
            .ok_or_else(|| FieldError::NotAnObject(kind(self)))?;
        object
            .get(name)
            .ok_or_else(|| FieldError::Missing(name.to_string()))
    }

    fn str_field(&self, name: &str) -> Result<&str, FieldError> {
        let value = self.field(name)?;
        value.as_str().ok_or_else(|| wrong_type(name, "string", value))
    }

    fn i64_field(&self, name: &str) -> Result<i64, FieldError> {
        let value = self.field(name)?;
        value.as_i64().ok_or_else(|| wrong_type(name, "integer", value))
    }

    fn array_field(&self, name: &str) -> Result<&Vec<Value>, FieldError> {
        let value = self.field(name)?;
        value.as_array().ok_or_else(|| wrong_type(name, "array", value))
    }
}

fn wrong_type(field: &str, expected: &'static str, actual: &Value) -> FieldError {
    FieldError::WrongType {
        field: field.to_string(),
        expected,
        actual: kind(actual),
    }
}
