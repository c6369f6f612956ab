//! Response assertions.
//!
//! Every function takes the response by shared reference, checks one
//! property and returns `Err(AssertionFailure)` naming the expected and
//! actual values when the property does not hold. JSON is parsed inside the
//! assertion that needs it; a decode error becomes
//! [`AssertionFailure::NotJson`] rather than escaping raw.

use serde_json::Value;

use crate::error::AssertionFailure;
use crate::http::{Headers, Response};
use crate::json;

type Outcome = Result<(), AssertionFailure>;

/// Longest body excerpt carried by a `NotJson` failure, in characters.
pub const BODY_EXCERPT_CHARS: usize = 512;

pub fn assert_status(response: &Response, expected: u16) -> Outcome {
    if response.status == expected {
        return Ok(());
    }
    Err(AssertionFailure::Status {
        expected,
        actual: response.status,
    })
}

pub fn assert_is_json(response: &Response) -> Outcome {
    parse_json(response).map(|_| ())
}

/// Check that the top-level field `field` equals `expected`. On failure the
/// caller's `message` leads the report.
pub fn assert_field_equals(
    response: &Response,
    field: &str,
    expected: impl Into<Value>,
    message: &str,
) -> Outcome {
    let expected = expected.into();
    let body = parse_json(response)?;
    let object = as_object(&body)?;
    match object.get(field) {
        Some(actual) if json::values_equal(actual, &expected) => Ok(()),
        Some(actual) => Err(AssertionFailure::FieldMismatch {
            message: message.to_string(),
            field: field.to_string(),
            expected,
            actual: actual.clone(),
        }),
        None => Err(AssertionFailure::FieldMissing {
            message: message.to_string(),
            field: field.to_string(),
        }),
    }
}

/// Check that `field` is present and is not `0`, `null`, `""` or `false`.
pub fn assert_field_nonzero(response: &Response, field: &str) -> Outcome {
    let body = parse_json(response)?;
    let object = as_object(&body)?;
    let message = format!("`{field}` should be set");
    let actual = object.get(field).ok_or_else(|| AssertionFailure::FieldMissing {
        message: message.clone(),
        field: field.to_string(),
    })?;
    let zero = match actual {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    };
    if zero {
        return Err(AssertionFailure::FieldMismatch {
            message,
            field: field.to_string(),
            expected: Value::String("a non-zero value".to_string()),
            actual: actual.clone(),
        });
    }
    Ok(())
}

/// Every key in `required` must be present in the top-level object.
pub fn assert_has_keys<K: AsRef<str>>(response: &Response, required: &[K]) -> Outcome {
    let body = parse_json(response)?;
    let object = as_object(&body)?;
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| !object.contains_key(*key))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AssertionFailure::MissingKeys { missing })
}

/// The body must be an array whose every element has `field == expected`.
/// An element without `field` fails even when `expected` is `null`.
pub fn assert_each_item_field_equals(
    response: &Response,
    field: &str,
    expected: impl Into<Value>,
) -> Outcome {
    let expected = expected.into();
    let body = parse_json(response)?;
    let items = body.as_array().ok_or(AssertionFailure::UnexpectedShape {
        expected: "array",
        actual: json::kind(&body),
    })?;
    for (index, item) in items.iter().enumerate() {
        let actual = item.get(field).ok_or_else(|| AssertionFailure::ItemFieldMissing {
            index,
            field: field.to_string(),
        })?;
        if !json::values_equal(actual, &expected) {
            return Err(AssertionFailure::ItemMismatch {
                index,
                field: field.to_string(),
                expected,
                actual: actual.clone(),
            });
        }
    }
    Ok(())
}

pub fn assert_header_equals(response: &Response, name: &str, expected: &str) -> Outcome {
    match response.header(name) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(AssertionFailure::HeaderMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        None => Err(AssertionFailure::HeaderMissing {
            name: name.to_string(),
        }),
    }
}

/// Walk the response headers; each one that also appears in `reference`
/// must carry exactly the reference value. Reference entries the response
/// lacks are not reported here; use [`assert_headers_present`] for that.
pub fn assert_headers_match(response: &Response, reference: &Headers) -> Outcome {
    for (name, actual) in response.headers.iter() {
        if let Some(expected) = reference.get(name) {
            if actual != expected {
                return Err(AssertionFailure::HeaderMismatch {
                    name: name.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
    }
    Ok(())
}

pub fn assert_headers_present<N: AsRef<str>>(response: &Response, names: &[N]) -> Outcome {
    match names.iter().map(AsRef::as_ref).find(|n| !response.headers.contains(n)) {
        Some(name) => Err(AssertionFailure::HeaderMissing {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Compare the media type of `Content-Type`, ignoring parameters such as
/// `charset` and letter case.
pub fn assert_content_type(response: &Response, media_type: &str) -> Outcome {
    let actual = response.header("content-type");
    let matches = actual
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(media_type));
    if matches {
        return Ok(());
    }
    Err(AssertionFailure::ContentType {
        expected: media_type.to_string(),
        actual: actual.map(str::to_string),
    })
}

fn parse_json(response: &Response) -> Result<Value, AssertionFailure> {
    response.json().map_err(|err| AssertionFailure::NotJson {
        reason: err.to_string(),
        body: excerpt(response),
    })
}

fn as_object(value: &Value) -> Result<&serde_json::Map<String, Value>, AssertionFailure> {
    value.as_object().ok_or(AssertionFailure::UnexpectedShape {
        expected: "object",
        actual: json::kind(value),
    })
}

fn excerpt(response: &Response) -> String {
    let text = response.text();
    match text.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}
