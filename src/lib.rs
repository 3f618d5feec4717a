// Client library for the Itella SmartPost parcel terminal service

// JSON API and shared operations
pub mod client;
// Legacy XML API
pub mod legacy_client;
// Synchronous wrapper
pub mod blocking;

pub mod config;
pub mod error;
pub mod json_wire;
pub mod models;
pub mod rejection;
pub mod xml_tree;
pub mod xml_wire;

mod text;
mod transport;

// Re-export key types for convenience
pub use blocking::BlockingClient;
pub use client::{Client, ParcelApi};
pub use config::ClientConfig;
pub use error::{DecodeError, Error, Result, ValidationError};
pub use legacy_client::LegacyClient;
pub use models::{
    AdditionalServices, AddressDestination, CashOnDelivery, Country, Destination, LabelFormat,
    Multiply, Order, OrderInfo, ParcelSize, Place, PlaceFilter, PlaceKind, Recipient,
    ReturnDays, Sender, SenderDoorCode, ShipmentDestination, ShipmentOrder, ShipmentSource,
    TerminalType, TimeWindow, Weight,
};
pub use rejection::{ErrorCode, ShipmentLabelsError, ShipmentOrderError, ShipmentOrderErrorDetails};
pub use xml_wire::Credentials;
