//! Wire-level wrappers shared by every endpoint

use serde::Deserialize;
use serde_json::Value;

/// Response body, either wrapped as `{ "data": T, ... }` or bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Best human-readable message in an error response body, if any.
///
/// The backend nests errors as `{ "error": { "message", "subErrors" } }`
/// inside the envelope; framework-level failures use a flat `message`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let nested = value.get("error").and_then(|error| {
        let message = error.get("message")?.as_str()?;
        let details: Vec<&str> = error
            .get("subErrors")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        Some(if details.is_empty() {
            message.to_string()
        } else {
            format!("{message} ({})", details.join(", "))
        })
    });

    nested
        .or_else(|| value.get("message")?.as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
}
