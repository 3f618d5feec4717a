// Domain records exchanged with the provider
pub mod labels;
pub mod order;
pub mod place;
pub mod shipment;

pub use labels::LabelFormat;
pub use order::{Order, OrderInfo, SenderDoorCode};
pub use place::{Country, Destination, Place, PlaceFilter, PlaceKind, TerminalType};
pub use shipment::{
    AdditionalServices, AddressDestination, CashOnDelivery, Multiply, ParcelSize, Recipient,
    ReturnDays, Sender, ShipmentDestination, ShipmentOrder, ShipmentSource, TimeWindow, Weight,
};
