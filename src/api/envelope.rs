//! Unwrapping the JSON envelope every endpoint responds with.
//!
//! A typical response looks like:
//! ```json
//! {
//!     "astro_status": 100,
//!     "astro_status_message": "Success",
//!     "returnData": {"customerID": "123", "first_name": "John"}
//! }
//! ```
//!
//! The key names drift between endpoints: some use `status` instead of
//! `astro_status`, and the message key is sometimes spelled
//! `astro_status_messsage`. Both variants are accepted as-is.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{AstroError, Result};

/// The application-level status code for a successful call.
pub const SUCCESS_STATUS: i64 = 100;

const STATUS_KEYS: [&str; 2] = ["astro_status", "status"];
const MESSAGE_KEYS: [&str; 2] = ["astro_status_message", "astro_status_messsage"];
const PAYLOAD_KEY: &str = "returnData";

/// Parses a response body and returns its payload.
///
/// A status field, when present, must equal [`SUCCESS_STATUS`]. Without one,
/// the HTTP-level success that got us here is taken at its word. An absent or
/// empty payload comes back as an empty object, never `null`.
pub fn unwrap_envelope(body: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|err| AstroError::api(format!("malformed response body: {err}")))?;
    let Value::Object(mut envelope) = parsed else {
        return Err(AstroError::api("response body is not a JSON object"));
    };

    match status_code(&envelope) {
        None | Some(StatusCode::Known(SUCCESS_STATUS)) => {}
        Some(StatusCode::Known(status)) => {
            let message = status_message(&envelope)
                .unwrap_or_else(|| format!("request failed with astro_status {status}"));
            warn!(status, message = %message, "API reported failure");
            return Err(AstroError::Api {
                status: Some(status),
                message,
            });
        }
        Some(StatusCode::Unreadable(raw)) => {
            let message = status_message(&envelope)
                .unwrap_or_else(|| format!("unrecognized astro_status {raw}"));
            warn!(status = %raw, message = %message, "API reported unreadable status");
            return Err(AstroError::Api {
                status: None,
                message,
            });
        }
    }

    Ok(normalize_payload(envelope.remove(PAYLOAD_KEY)))
}

/// A status field that was present in the envelope.
#[derive(Debug, PartialEq)]
enum StatusCode {
    Known(i64),
    /// Present but not a whole number, e.g. `"ERROR"` or `1.5`.
    Unreadable(Value),
}

/// Reads the first non-null status key. `None` only when no status was sent.
fn status_code(envelope: &Map<String, Value>) -> Option<StatusCode> {
    let value = STATUS_KEYS
        .iter()
        .filter_map(|key| envelope.get(*key))
        .find(|value| !value.is_null())?;

    let code = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    Some(code.map_or_else(|| StatusCode::Unreadable(value.clone()), StatusCode::Known))
}

fn status_message(envelope: &Map<String, Value>) -> Option<String> {
    MESSAGE_KEYS
        .iter()
        .filter_map(|key| envelope.get(*key))
        .find_map(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn normalize_payload(payload: Option<Value>) -> Value {
    let is_empty = match &payload {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    };

    match payload {
        Some(value) if !is_empty => value,
        _ => Value::Object(Map::new()),
    }
}
