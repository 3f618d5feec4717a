// Serde helpers for values the provider sends as text.
//
// Both wire formats end up as a serde_json tree before typed decoding. In the
// XML tree every leaf is a string and empty elements are null, while the JSON
// API mixes numbers and numeric strings.
use std::fmt::Display;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber<T> {
    Number(T),
    Text(String),
}

/// A number that may arrive either as a JSON number or as numeric text.
/// Unparsable text is a hard error.
pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match TextOrNumber::<T>::deserialize(deserializer)? {
        TextOrNumber::Number(value) => Ok(value),
        TextOrNumber::Text(text) => text
            .trim()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid number {text:?}: {e}"))),
    }
}

/// A text field that must be present but may be empty (`<description/>`).
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// An identifier the provider sends either as text or as a bare number.
pub(crate) fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_scalar(deserializer)?.ok_or_else(|| de::Error::custom("expected a scalar, got null"))
}

/// Echoed input can be any scalar.
pub(crate) fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar input value, got {other}"
        ))),
    }
}
