//! Parameter bag encoding for list and filter endpoints
//!
//! Entries whose value is `null` or an empty string are dropped before
//! encoding, so an absent filter is never sent as an empty parameter.

use super::ClientError;
use serde::Serialize;
use serde_json::Value;

/// Encode a parameter bag as a query string, without the leading `?`.
///
/// The bag may be any serializable map or struct; `None` fields serialize
/// to `null` and are dropped with empty strings. Key order is preserved.
pub fn encode_query<P: Serialize + ?Sized>(params: &P) -> Result<String, ClientError> {
    let entries = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(ClientError::InvalidParams(format!(
                "expected a map of parameters, got {other}"
            )));
        }
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in &entries {
        if let Some(value) = render(value) {
            serializer.append_pair(key, &value);
        }
    }
    Ok(serializer.finish())
}

/// Append a cleaned query string to an endpoint path
pub fn with_query<P: Serialize + ?Sized>(endpoint: &str, params: &P) -> Result<String, ClientError> {
    let query = encode_query(params)?;
    if query.is_empty() {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("{endpoint}?{query}"))
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
