// Request bodies and response decoding for the JSON API
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DecodeError, Error, Result};
use crate::models::{Order, Place, ShipmentOrder};
use crate::rejection::{ErrorItem, JsonErrorItem, ShipmentOrderError};

#[derive(Serialize)]
struct OrdersRequest<'a> {
    orders: OrdersBody<'a>,
}

#[derive(Serialize)]
struct OrdersBody<'a> {
    report: &'a [String],
    item: &'a [ShipmentOrder],
}

/// Serializes `{"orders": {"report": [...], "item": [...]}}`.
pub fn encode_orders(orders: &[ShipmentOrder], report_emails: &[String]) -> Result<Vec<u8>> {
    let request = OrdersRequest {
        orders: OrdersBody {
            report: report_emails,
            item: orders,
        },
    };
    serde_json::to_vec(&request).map_err(|e| Error::Encode(e.to_string()))
}

// Walks `path` and returns the list found there. A lone object is treated as a
// one-element list, null is not a list.
pub(crate) fn select_items(mut value: Value, path: &[&str]) -> Result<Vec<Value>, DecodeError> {
    for (depth, key) in path.iter().enumerate() {
        value = match value {
            Value::Object(mut map) => map
                .remove(*key)
                .ok_or_else(|| DecodeError::MissingRequiredField(path[..=depth].join(".")))?,
            _ => return Err(DecodeError::MissingRequiredField(path[..=depth].join("."))),
        };
    }
    match value {
        Value::Array(items) => Ok(items),
        item @ Value::Object(_) => Ok(vec![item]),
        other => Err(DecodeError::MissingRequiredField(format!(
            "{} (expected a list, got {other})",
            path.join(".")
        ))),
    }
}

pub(crate) fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, DecodeError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(DecodeError::from))
        .collect()
}

fn decode_list<T: DeserializeOwned>(body: &[u8], path: &[&str]) -> Result<Vec<T>, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_items(select_items(value, path)?)
}

pub fn decode_places(body: &[u8]) -> Result<Vec<Place>, DecodeError> {
    decode_list(body, &["places", "item"])
}

pub fn decode_orders(body: &[u8]) -> Result<Vec<Order>, DecodeError> {
    decode_list(body, &["orders", "item"])
}

/// Decodes the body of an HTTP 400 order response.
pub fn decode_rejection(body: &[u8]) -> Result<ShipmentOrderError, DecodeError> {
    let items: Vec<JsonErrorItem> = decode_list(body, &["error", "item"])?;
    ShipmentOrderError::from_items(items.into_iter().map(ErrorItem::Json).collect())
}
