// Error types shared by both API clients
use thiserror::Error;

use crate::rejection::{ShipmentLabelsError, ShipmentOrderError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

// Top-level error returned by every facade operation
#[derive(Error, Debug)]
pub enum Error {
    /// Timeouts, refused connections, TLS failures and non-2xx listing responses.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    OrderRejected(#[from] ShipmentOrderError),

    #[error(transparent)]
    Labels(#[from] ShipmentLabelsError),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

// A response body that does not match the provider contract. Never recovered
// from with defaults.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Unknown shipment error code: {0:?}")]
    UnknownErrorCode(String),
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        DecodeError::XmlParseError(err.to_string())
    }
}

// Rejected while constructing a caller-side value, before any request exists
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("multiply must be within 1..=20, got {0}")]
    MultiplyOutOfRange(u8),

    #[error("customer return days must be within 0..=90, got {0}")]
    ReturnDaysOutOfRange(u8),

    #[error("weight must be a non-negative finite number of kilograms, got {0}")]
    InvalidWeight(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_message_names_the_field() {
        let err = DecodeError::MissingRequiredField("barcode".to_string());
        assert_eq!(err.to_string(), "Missing required field: barcode");
    }

    #[test]
    fn decode_error_converts_into_top_level_error() {
        let err: Error = DecodeError::UnknownErrorCode("999".to_string()).into();
        assert!(matches!(err, Error::Decode(_)));
        assert_eq!(
            err.to_string(),
            "Decode error: Unknown shipment error code: \"999\""
        );
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DecodeError = json_err.into();
        assert!(matches!(err, DecodeError::JsonParseError(_)));
    }
}
