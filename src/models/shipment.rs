// Caller-constructed shipment orders.
//
// Every optional field is an Option and is skipped when unset: the provider
// treats the presence of a key as meaningful (a sender block alone activates
// the door code service).
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::models::place::Country;

fn lowercase_country<S: Serializer>(country: &Country, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(country.as_lowercase())
}

/// Where the parcel is sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShipmentSource {
    #[serde(serialize_with = "lowercase_country")]
    pub country: Country,
}

impl ShipmentSource {
    pub fn new(country: Country) -> Self {
        Self { country }
    }
}

/// Cash on delivery amount. The provider accepts either the goods value or the
/// transport value, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CashOnDelivery {
    Goods(f64),
    Transport(f64),
}

impl CashOnDelivery {
    pub fn amount(&self) -> f64 {
        match self {
            CashOnDelivery::Goods(amount) | CashOnDelivery::Transport(amount) => *amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipient {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub cash_on_delivery: Option<CashOnDelivery>,
    /// Needed when the parcel is handed out only after ID validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idcode: Option<String>,
}

impl Recipient {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
            cash_on_delivery: None,
            idcode: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_cash_on_delivery(mut self, cash: CashOnDelivery) -> Self {
        self.cash_on_delivery = Some(cash);
        self
    }

    pub fn with_idcode(mut self, idcode: impl Into<String>) -> Self {
        self.idcode = Some(idcode.into());
        self
    }
}

/// Only needed when the "sending with door code" service is used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sender {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Amount the sender pays before the parcel is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
}

impl Sender {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
            cash: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_cash(mut self, cash: f64) -> Self {
        self.cash = Some(cash);
        self
    }
}

/// When the recipient is available for a courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    Any = 1,
    /// 09:00 - 17:00
    Daytime = 2,
    /// 17:00 - 21:00
    Evening = 3,
}

impl TimeWindow {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for TimeWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

// Courier delivery to a street address
#[derive(Debug, Clone, PartialEq)]
pub struct AddressDestination {
    pub postalcode: String,
    /// Either the street alone or street, house and apartment in one line.
    pub street: String,
    pub house: Option<String>,
    pub apartment: Option<String>,
    pub city: String,
    pub country: Country,
    /// Extra hints for the courier, e.g. "third floor".
    pub details: Option<String>,
    pub timewindow: TimeWindow,
}

impl AddressDestination {
    // Marker the provider uses to tell address deliveries from terminals
    pub const PLACE_ID: &'static str = "1";

    pub fn new(
        postalcode: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        country: Country,
    ) -> Self {
        Self {
            postalcode: postalcode.into(),
            street: street.into(),
            house: None,
            apartment: None,
            city: city.into(),
            country,
            details: None,
            timewindow: TimeWindow::Any,
        }
    }

    pub fn with_house(mut self, house: impl Into<String>) -> Self {
        self.house = Some(house.into());
        self
    }

    pub fn with_apartment(mut self, apartment: impl Into<String>) -> Self {
        self.apartment = Some(apartment.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_timewindow(mut self, timewindow: TimeWindow) -> Self {
        self.timewindow = timewindow;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShipmentDestination {
    Terminal {
        place_id: String,
        country: Country,
    },
    Address(AddressDestination),
    RoutingCode {
        country: Country,
        postalcode: String,
        routingcode: String,
    },
}

impl Serialize for ShipmentDestination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            ShipmentDestination::Terminal { place_id, country } => {
                map.serialize_entry("place_id", place_id)?;
                map.serialize_entry("country", country.as_lowercase())?;
            }
            ShipmentDestination::Address(address) => {
                map.serialize_entry("place_id", AddressDestination::PLACE_ID)?;
                map.serialize_entry("postalcode", &address.postalcode)?;
                map.serialize_entry("street", &address.street)?;
                if let Some(house) = &address.house {
                    map.serialize_entry("house", house)?;
                }
                if let Some(apartment) = &address.apartment {
                    map.serialize_entry("apartment", apartment)?;
                }
                map.serialize_entry("city", &address.city)?;
                map.serialize_entry("country", address.country.as_lowercase())?;
                if let Some(details) = &address.details {
                    map.serialize_entry("details", details)?;
                }
                map.serialize_entry("timewindow", &address.timewindow)?;
            }
            ShipmentDestination::RoutingCode {
                country,
                postalcode,
                routingcode,
            } => {
                map.serialize_entry("country", country.as_lowercase())?;
                map.serialize_entry("postalcode", postalcode)?;
                map.serialize_entry("routingcode", routingcode)?;
            }
        }
        map.end()
    }
}

/// Number of identical parcels to create from one order (1-20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Multiply(u8);

impl Multiply {
    pub fn new(count: u8) -> Result<Self, ValidationError> {
        if (1..=20).contains(&count) {
            Ok(Self(count))
        } else {
            Err(ValidationError::MultiplyOutOfRange(count))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Days the customer may return the order, 0 disallows returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReturnDays(u8);

impl ReturnDays {
    pub fn new(days: u8) -> Result<Self, ValidationError> {
        if days <= 90 {
            Ok(Self(days))
        } else {
            Err(ValidationError::ReturnDaysOutOfRange(days))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Shipment weight in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    pub fn new(kg: f64) -> Result<Self, ValidationError> {
        if kg.is_finite() && kg >= 0.0 {
            Ok(Self(kg))
        } else {
            Err(ValidationError::InvalidWeight(kg))
        }
    }

    pub fn kg(&self) -> f64 {
        self.0
    }
}

/// Parcel size, required when sent via APT using a sender pin code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParcelSize {
    Xs,
    S,
    M,
    L,
    Xl,
}

impl ParcelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelSize::Xs => "XS",
            ParcelSize::S => "S",
            ParcelSize::M => "M",
            ParcelSize::L => "L",
            ParcelSize::Xl => "XL",
        }
    }
}

/// Free-form service flags, e.g. `labelprinted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AdditionalServices(BTreeMap<String, bool>);

impl AdditionalServices {
    pub const LABEL_PRINTED: &'static str = "labelprinted";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, flag: impl Into<String>, enabled: bool) -> Self {
        self.0.insert(flag.into(), enabled);
        self
    }

    pub fn label_printed(self, enabled: bool) -> Self {
        self.with(Self::LABEL_PRINTED, enabled)
    }

    pub fn get(&self, flag: &str) -> Option<bool> {
        self.0.get(flag).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(flag, enabled)| (flag.as_str(), *enabled))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentOrder {
    pub source: ShipmentSource,
    pub recipient: Recipient,
    pub destination: ShipmentDestination,
    /// Generated by the provider when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Customer's reference number, printed on the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Shipment content, printed on the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Barcode of the order this parcel is grouped under.
    #[serde(rename = "orderparent", skip_serializing_if = "Option::is_none")]
    pub order_parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiply: Option<Multiply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<ParcelSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_return_days: Option<ReturnDays>,
    #[serde(rename = "additionalservices", skip_serializing_if = "Option::is_none")]
    pub additional_services: Option<AdditionalServices>,
}

impl ShipmentOrder {
    pub fn new(
        source: ShipmentSource,
        recipient: Recipient,
        destination: ShipmentDestination,
    ) -> Self {
        Self {
            source,
            recipient,
            destination,
            barcode: None,
            reference: None,
            content: None,
            order_parent: None,
            multiply: None,
            weight: None,
            size: None,
            sender: None,
            customer_return_days: None,
            additional_services: None,
        }
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_order_parent(mut self, order_parent: impl Into<String>) -> Self {
        self.order_parent = Some(order_parent.into());
        self
    }

    pub fn with_multiply(mut self, multiply: Multiply) -> Self {
        self.multiply = Some(multiply);
        self
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_size(mut self, size: ParcelSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_customer_return_days(mut self, days: ReturnDays) -> Self {
        self.customer_return_days = Some(days);
        self
    }

    pub fn with_additional_services(mut self, services: AdditionalServices) -> Self {
        self.additional_services = Some(services);
        self
    }
}
