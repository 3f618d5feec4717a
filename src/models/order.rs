// Confirmation records for accepted shipment orders
use serde::Deserialize;

use crate::text;

/// Present only when the "sending with door code" service was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SenderDoorCode {
    #[serde(deserialize_with = "text::number")]
    pub doorcode: u32,
}

/// Accepted order from the JSON API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "text::scalar")]
    pub barcode: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub sender: Option<SenderDoorCode>,
}

/// Accepted order from the legacy XML API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderInfo {
    #[serde(deserialize_with = "text::scalar")]
    pub barcode: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub sender: Option<SenderDoorCode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn door_code_is_normalized_to_a_number() {
        let order: Order = serde_json::from_value(json!({
            "barcode": "JJFI123",
            "reference": "ref-1",
            "sender": {"doorcode": "4711"}
        }))
        .unwrap();
        assert_eq!(order.sender, Some(SenderDoorCode { doorcode: 4711 }));
    }

    #[test]
    fn minimal_ack_has_no_optional_fields() {
        let order: Order = serde_json::from_value(json!({"barcode": "JJFI123"})).unwrap();
        assert_eq!(order.reference, None);
        assert_eq!(order.sender, None);
    }

    #[test]
    fn empty_xml_elements_read_as_absent() {
        let info: OrderInfo = serde_json::from_value(json!({
            "barcode": "0000123",
            "reference": null,
            "sender": null
        }))
        .unwrap();
        assert_eq!(info.barcode, "0000123");
        assert_eq!(info.reference, None);
        assert_eq!(info.sender, None);
    }

    #[test]
    fn barcode_is_required() {
        let err = serde_json::from_value::<OrderInfo>(json!({"reference": "r"})).unwrap_err();
        assert!(err.to_string().contains("barcode"));
    }

    #[test]
    fn non_numeric_door_code_fails() {
        let result = serde_json::from_value::<Order>(json!({
            "barcode": "JJFI123",
            "sender": {"doorcode": "12ab"}
        }));
        assert!(result.is_err());
    }
}
