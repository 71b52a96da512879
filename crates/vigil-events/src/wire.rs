//! Inbound wire envelope: `{ "t": number, "event": string, "payload": any }`.
//!
//! Every field is optional on the wire. A missing or non-numeric `t`
//! becomes `NaN`, a missing or non-string `event` becomes the empty tag
//! (which normalizes to `unknown`), and a missing `payload` becomes `null`.

use serde_json::{Map, Value};
use vigil_types::RawEvent;

use crate::error::EventError;

/// Coerce the members of an envelope object.
fn from_object(mut object: Map<String, Value>) -> RawEvent {
    let timestamp = object.get("t").and_then(Value::as_f64).unwrap_or(f64::NAN);
    let tag = match object.remove("event") {
        Some(Value::String(tag)) => tag,
        _ => String::new(),
    };
    let payload = object.remove("payload").unwrap_or(Value::Null);
    RawEvent::new(timestamp, tag, payload)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a message body into a [`RawEvent`].
///
/// # Errors
///
/// Returns [`EventError::MalformedEnvelope`] if the body is not JSON, or
/// [`EventError::NotAnObject`] if it is JSON but not an object. Arrays
/// are never read positionally.
pub fn parse_envelope(body: &[u8]) -> Result<RawEvent, EventError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(object) => Ok(from_object(object)),
        other => Err(EventError::NotAnObject {
            found: json_kind(&other),
        }),
    }
}

/// Coerce an already-decoded JSON value into a [`RawEvent`].
///
/// Values that are not objects yield an empty-tagged event with a `NaN`
/// timestamp and a `null` payload rather than an error.
pub fn raw_event_from_value(value: Value) -> RawEvent {
    match value {
        Value::Object(object) => from_object(object),
        _ => RawEvent::new(f64::NAN, String::new(), Value::Null),
    }
}
