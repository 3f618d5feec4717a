// Request documents and response decoding for the legacy XML API.
//
// Credentials travel inside every request document as an <authentication>
// element. Responses go through `xml_tree` and are then decoded like JSON.
use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;

use crate::error::{DecodeError, Error, Result};
use crate::json_wire::{decode_items, select_items};
use crate::models::{
    AdditionalServices, AddressDestination, CashOnDelivery, Destination, LabelFormat, OrderInfo,
    Recipient, Sender, ShipmentDestination, ShipmentOrder,
};
use crate::rejection::{ErrorItem, ShipmentOrderError, XmlErrorItem};
use crate::xml_tree;

const LIST_ELEMENTS: &[&str] = &["item"];

/// Username and password of a legacy API account.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

fn write_optional_display<W: Write, T: ToString>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<T>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, &v.to_string())?;
    }
    Ok(())
}

fn write_authentication<W: Write>(
    writer: &mut Writer<W>,
    credentials: &Credentials,
) -> io::Result<()> {
    writer
        .create_element("authentication")
        .write_inner_content(|w| {
            write_text_element(w, "user", &credentials.username)?;
            write_text_element(w, "password", &credentials.password)
        })?;
    Ok(())
}

fn write_recipient<W: Write>(writer: &mut Writer<W>, recipient: &Recipient) -> io::Result<()> {
    writer.create_element("recipient").write_inner_content(|w| {
        write_text_element(w, "name", &recipient.name)?;
        write_text_element(w, "phone", &recipient.phone)?;
        write_optional_text(w, "email", recipient.email.as_deref())?;
        let cash = recipient.cash_on_delivery.as_ref().map(CashOnDelivery::amount);
        write_optional_display(w, "cash", cash)?;
        write_optional_text(w, "idcode", recipient.idcode.as_deref())
    })?;
    Ok(())
}

fn write_destination<W: Write>(
    writer: &mut Writer<W>,
    destination: &ShipmentDestination,
) -> io::Result<()> {
    writer
        .create_element("destination")
        .write_inner_content(|w| match destination {
            ShipmentDestination::Terminal { place_id, .. } => {
                write_text_element(w, "place_id", place_id)
            }
            ShipmentDestination::RoutingCode {
                postalcode,
                routingcode,
                ..
            } => {
                write_text_element(w, "postalcode", postalcode)?;
                write_text_element(w, "routingcode", routingcode)
            }
            ShipmentDestination::Address(address) => {
                write_text_element(w, "place_id", AddressDestination::PLACE_ID)?;
                write_text_element(w, "postalcode", &address.postalcode)?;
                write_text_element(w, "street", &address.street)?;
                write_optional_text(w, "house", address.house.as_deref())?;
                write_optional_text(w, "apartment", address.apartment.as_deref())?;
                write_text_element(w, "city", &address.city)?;
                write_text_element(w, "country", address.country.as_lowercase())?;
                write_optional_text(w, "details", address.details.as_deref())?;
                write_text_element(w, "timewindow", &address.timewindow.as_u8().to_string())
            }
        })?;
    Ok(())
}

fn write_sender<W: Write>(writer: &mut Writer<W>, sender: &Sender) -> io::Result<()> {
    writer.create_element("sender").write_inner_content(|w| {
        write_text_element(w, "name", &sender.name)?;
        write_text_element(w, "phone", &sender.phone)?;
        write_optional_text(w, "email", sender.email.as_deref())?;
        write_optional_display(w, "cash", sender.cash)
    })?;
    Ok(())
}

// Service flags become element names, so they must be plain XML names
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn write_additional_services<W: Write>(
    writer: &mut Writer<W>,
    services: &AdditionalServices,
) -> io::Result<()> {
    writer
        .create_element("additionalservices")
        .write_inner_content(|w| {
            for (flag, enabled) in services.iter() {
                if !is_element_name(flag) {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("additional service {flag:?} is not a valid XML element name"),
                    ));
                }
                write_text_element(w, flag, if enabled { "true" } else { "false" })?;
            }
            Ok(())
        })?;
    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, order: &ShipmentOrder) -> io::Result<()> {
    writer.create_element("item").write_inner_content(|w| {
        write_recipient(w, &order.recipient)?;
        write_destination(w, &order.destination)?;
        write_optional_text(w, "barcode", order.barcode.as_deref())?;
        write_optional_text(w, "reference", order.reference.as_deref())?;
        write_optional_text(w, "content", order.content.as_deref())?;
        write_optional_text(w, "orderparent", order.order_parent.as_deref())?;
        write_optional_display(w, "weight", order.weight.map(|weight| weight.kg()))?;
        write_optional_text(w, "size", order.size.as_ref().map(|size| size.as_str()))?;
        write_optional_display(w, "multiply", order.multiply.map(|multiply| multiply.get()))?;
        if let Some(sender) = &order.sender {
            write_sender(w, sender)?;
        }
        write_optional_display(
            w,
            "customer_return_days",
            order.customer_return_days.map(|days| days.get()),
        )?;
        if let Some(services) = &order.additional_services {
            write_additional_services(w, services)?;
        }
        Ok(())
    })?;
    Ok(())
}

fn document<F>(root: &str, content: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Writer<&mut Vec<u8>>) -> io::Result<()>,
{
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .and_then(|_| writer.create_element(root).write_inner_content(content).map(|_| ()))
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(buf)
}

/// Builds the `<orders>` document for a shipment request.
pub fn encode_orders(
    credentials: &Credentials,
    orders: &[ShipmentOrder],
    report_emails: &[String],
) -> Result<Vec<u8>> {
    document("orders", |w| {
        write_authentication(w, credentials)?;
        w.create_element("report").write_inner_content(|w| {
            for email in report_emails {
                write_text_element(w, "email", email)?;
            }
            Ok(())
        })?;
        for order in orders {
            write_item(w, order)?;
        }
        Ok(())
    })
}

/// Builds the `<labels>` document. Barcodes keep their input order.
pub fn encode_labels_request(
    credentials: &Credentials,
    format: LabelFormat,
    barcodes: &[String],
) -> Result<Vec<u8>> {
    document("labels", |w| {
        write_authentication(w, credentials)?;
        write_text_element(w, "format", format.as_str())?;
        for barcode in barcodes {
            write_text_element(w, "barcode", barcode)?;
        }
        Ok(())
    })
}

// The root element name differs per response and is not checked
fn root_items(body: &str) -> Result<Vec<Value>, DecodeError> {
    let (_root, tree) = xml_tree::parse(body, LIST_ELEMENTS)?;
    match tree {
        Value::Null => Ok(Vec::new()),
        tree => select_items(tree, &["item"]),
    }
}

pub fn decode_destinations(body: &str) -> Result<Vec<Destination>, DecodeError> {
    decode_items(root_items(body)?)
}

pub fn decode_order_infos(body: &str) -> Result<Vec<OrderInfo>, DecodeError> {
    decode_items(root_items(body)?)
}

/// Decodes the body of an HTTP 400 order response.
pub fn decode_rejection(body: &str) -> Result<ShipmentOrderError, DecodeError> {
    let items: Vec<XmlErrorItem> = decode_items(root_items(body)?)?;
    ShipmentOrderError::from_items(items.into_iter().map(ErrorItem::Xml).collect())
}
