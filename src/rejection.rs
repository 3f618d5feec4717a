// Structured errors returned by the provider for rejected orders and label requests
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::error::DecodeError;
use crate::text;

/// Machine error codes the provider reports for a rejected order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DestinationMissing,
    RequiredInputMissing,
    BarcodeExists,
    NotPhoneNumber,
    NotEmailAddress,
    NotNumeric,
    UnknownDestination,
    NotExpressTerminal,
    MultipleDestinations,
    CourierTimeframeMissing,
    CourierCityMissing,
    CourierPostalCodeMissing,
    CourierAddressMissing,
    CodNotAvailable,
    InvalidDoorSize,
    StringTooLong,
    IntegerOutOfBounds,
    ValueNotInEnum,
    DoorCodeNotActivated,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 19] = [
        ErrorCode::DestinationMissing,
        ErrorCode::RequiredInputMissing,
        ErrorCode::BarcodeExists,
        ErrorCode::NotPhoneNumber,
        ErrorCode::NotEmailAddress,
        ErrorCode::NotNumeric,
        ErrorCode::UnknownDestination,
        ErrorCode::NotExpressTerminal,
        ErrorCode::MultipleDestinations,
        ErrorCode::CourierTimeframeMissing,
        ErrorCode::CourierCityMissing,
        ErrorCode::CourierPostalCodeMissing,
        ErrorCode::CourierAddressMissing,
        ErrorCode::CodNotAvailable,
        ErrorCode::InvalidDoorSize,
        ErrorCode::StringTooLong,
        ErrorCode::IntegerOutOfBounds,
        ErrorCode::ValueNotInEnum,
        ErrorCode::DoorCodeNotActivated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DestinationMissing => "000",
            ErrorCode::RequiredInputMissing => "001",
            ErrorCode::BarcodeExists => "002",
            ErrorCode::NotPhoneNumber => "003",
            ErrorCode::NotEmailAddress => "004",
            ErrorCode::NotNumeric => "005",
            ErrorCode::UnknownDestination => "006",
            ErrorCode::NotExpressTerminal => "007",
            ErrorCode::MultipleDestinations => "008",
            ErrorCode::CourierTimeframeMissing => "009",
            ErrorCode::CourierCityMissing => "010",
            ErrorCode::CourierPostalCodeMissing => "011",
            ErrorCode::CourierAddressMissing => "012",
            ErrorCode::CodNotAvailable => "013",
            ErrorCode::InvalidDoorSize => "014",
            ErrorCode::StringTooLong => "015",
            ErrorCode::IntegerOutOfBounds => "016",
            ErrorCode::ValueNotInEnum => "017",
            ErrorCode::DoorCodeNotActivated => "018",
        }
    }

    /// Human readable explanation of the code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::DestinationMissing => "Destination info missing",
            ErrorCode::RequiredInputMissing => "Required input missing",
            ErrorCode::BarcodeExists => "Barcode already exists",
            ErrorCode::NotPhoneNumber => "Not a phone number",
            ErrorCode::NotEmailAddress => "Not an e-mail address",
            ErrorCode::NotNumeric => "Not numeric",
            ErrorCode::UnknownDestination => "Unknown destination (place_id)",
            ErrorCode::NotExpressTerminal => {
                "Express checked but destination is not a express APT"
            }
            ErrorCode::MultipleDestinations => "Multiple destinations set",
            ErrorCode::CourierTimeframeMissing => "Courier service timeframe missing",
            ErrorCode::CourierCityMissing => "Courier service city missing",
            ErrorCode::CourierPostalCodeMissing => "Courier service postal code missing",
            ErrorCode::CourierAddressMissing => "Courier address missing",
            ErrorCode::CodNotAvailable => "COD used but service not available",
            ErrorCode::InvalidDoorSize => "Invalid door size",
            ErrorCode::StringTooLong => "String too long (LQ items)",
            ErrorCode::IntegerOutOfBounds => "Integer out of bounds (LQ items)",
            ErrorCode::ValueNotInEnum => "Value not in enum list (LQ items)",
            ErrorCode::DoorCodeNotActivated => "Sending with door code service not activated",
        }
    }
}

impl FromStr for ErrorCode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownErrorCode(s.to_string()))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Wire forms of a single rejected item. The JSON API nests the error under the
// item when the item is identified by barcode, otherwise reports it flat.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonErrorItem {
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "text::optional_scalar")]
    pub input: Option<String>,
    #[serde(default)]
    pub error: Option<JsonErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonErrorBody {
    pub code: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "text::optional_scalar")]
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct XmlErrorItem {
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(deserialize_with = "text::string")]
    pub code: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorItem {
    Json(JsonErrorItem),
    Xml(XmlErrorItem),
}

/// One malformed-input datum from a rejected order submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentOrderErrorDetails {
    pub barcode: Option<String>,
    pub reference: Option<String>,
    pub code: ErrorCode,
    pub message: &'static str,
    pub text: String,
    pub input: Option<String>,
    /// Only reported by the XML API.
    pub field: Option<String>,
}

impl TryFrom<ErrorItem> for ShipmentOrderErrorDetails {
    type Error = DecodeError;

    fn try_from(item: ErrorItem) -> Result<Self, Self::Error> {
        match item {
            ErrorItem::Json(item) => {
                let (code, text, input) = match (&item.barcode, item.error) {
                    (Some(_), Some(error)) => (error.code, error.text, error.input),
                    (Some(_), None) => {
                        return Err(DecodeError::MissingRequiredField("error".to_string()))
                    }
                    (None, _) => (item.code.unwrap_or_default(), item.text, item.input),
                };
                let code: ErrorCode = code.parse()?;
                Ok(Self {
                    barcode: item.barcode,
                    reference: item.reference,
                    code,
                    message: code.message(),
                    text: text.unwrap_or_default(),
                    input,
                    field: None,
                })
            }
            ErrorItem::Xml(item) => {
                let code: ErrorCode = item.code.parse()?;
                Ok(Self {
                    barcode: item.barcode,
                    reference: item.reference,
                    code,
                    message: code.message(),
                    text: item.text.unwrap_or_default(),
                    input: item.input,
                    field: item.field,
                })
            }
        }
    }
}

impl fmt::Display for ShipmentOrderErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShipmentOrderErrorDetails(barcode={:?}, reference={:?}, code={}, message={}, text={}, input={:?})",
            self.barcode, self.reference, self.code, self.message, self.text, self.input
        )
    }
}

// Raised when the provider answers an order submission with HTTP 400
#[derive(Error, Debug, Clone, PartialEq)]
#[error("shipment orders rejected with {} error(s)", .errors.len())]
pub struct ShipmentOrderError {
    pub errors: Vec<ShipmentOrderErrorDetails>,
}

impl ShipmentOrderError {
    pub fn from_items(items: Vec<ErrorItem>) -> Result<Self, DecodeError> {
        let errors = items
            .into_iter()
            .map(ShipmentOrderErrorDetails::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { errors })
    }
}

// Raised on any non-200 label response. The body is kept untouched because it
// may be structured or plain text depending on provider state.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("label request failed with status {status_code}")]
pub struct ShipmentLabelsError {
    pub body: Bytes,
    pub status_code: u16,
}
