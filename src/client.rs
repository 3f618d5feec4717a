// Async client for the JSON API and the operations shared by both API generations
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, JSON_API_BASE_URL};
use crate::error::Result;
use crate::json_wire;
use crate::models::{
    Country, LabelFormat, Order, Place, PlaceFilter, ShipmentOrder, TerminalType,
};
use crate::rejection::ShipmentLabelsError;
use crate::transport::Transport;

const PLACES_PATH: &str = "/api/ext/v1/places";
const ORDERS_PATH: &str = "/api/ext/v1/orders";
const LABELS_PATH: &str = "/api/ext/v1/labels";

/// Operations offered by both API generations. Every call issues exactly one
/// request and is never retried.
#[async_trait]
pub trait ParcelApi: Send + Sync {
    /// Pickup location record returned by listings.
    type Place: Send;
    /// Confirmation record for an accepted order.
    type Confirmation: Send;

    /// Lists pickup locations. Non-2xx responses surface as transport errors.
    async fn terminals(
        &self,
        country: Country,
        kind: TerminalType,
        filter: Option<PlaceFilter>,
    ) -> Result<Vec<Self::Place>>;

    /// Submits shipment orders. HTTP 400 becomes [`crate::Error::OrderRejected`].
    async fn submit_orders(
        &self,
        orders: &[ShipmentOrder],
        report_emails: &[String],
    ) -> Result<Vec<Self::Confirmation>>;

    /// Fetches a PDF with one label per barcode, returned unmodified.
    async fn labels(&self, format: LabelFormat, barcodes: &[String]) -> Result<Bytes>;

    /// Releases pooled connections. The client stays usable.
    fn close(&self);

    async fn ee_terminals(&self) -> Result<Vec<Self::Place>> {
        self.terminals(Country::Ee, TerminalType::ParcelTerminal, None)
            .await
    }

    async fn ee_express_terminals(&self) -> Result<Vec<Self::Place>> {
        self.terminals(
            Country::Ee,
            TerminalType::ParcelTerminal,
            Some(PlaceFilter::Express),
        )
        .await
    }

    async fn fi_terminals(&self) -> Result<Vec<Self::Place>> {
        self.terminals(Country::Fi, TerminalType::ParcelTerminal, None)
            .await
    }

    async fn fi_post_offices(&self) -> Result<Vec<Self::Place>> {
        self.terminals(Country::Fi, TerminalType::PostOffice, None)
            .await
    }
}

pub(crate) async fn read_labels(response: reqwest::Response) -> Result<Bytes> {
    let status = response.status();
    let body = response.bytes().await?;
    if status != StatusCode::OK {
        warn!(status = status.as_u16(), body_len = body.len(), "label request failed");
        return Err(ShipmentLabelsError {
            body,
            status_code: status.as_u16(),
        }
        .into());
    }
    debug!(bytes = body.len(), "received label document");
    Ok(body)
}

/// Client for the JSON API at `gateway.posti.fi`, authenticated with an API key.
#[derive(Debug)]
pub struct Client {
    transport: Transport,
}

impl Client {
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Fails with [`crate::Error::Config`] when the key cannot be sent as a
    /// header value. No connection is opened here.
    pub fn with_config(api_key: impl AsRef<str>, config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(config, JSON_API_BASE_URL)
            .with_header(AUTHORIZATION, api_key.as_ref(), true)?
            .with_json_content()?;
        Ok(Self { transport })
    }

    /// The memoized HTTP client, built on first use.
    pub fn get_transport(&self) -> Result<reqwest::Client> {
        self.transport.get()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[async_trait]
impl ParcelApi for Client {
    type Place = Place;
    type Confirmation = Order;

    async fn terminals(
        &self,
        country: Country,
        kind: TerminalType,
        filter: Option<PlaceFilter>,
    ) -> Result<Vec<Place>> {
        let mut query = vec![("country", country.as_str()), ("type", kind.as_str())];
        if let Some(filter) = filter {
            query.push(("filter", filter.as_str()));
        }
        debug!(%country, kind = %kind, ?filter, "listing places");

        let response = self
            .get_transport()?
            .get(self.transport.url(PLACES_PATH))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let places = json_wire::decode_places(&body)?;
        debug!(count = places.len(), "decoded places");
        Ok(places)
    }

    async fn submit_orders(
        &self,
        orders: &[ShipmentOrder],
        report_emails: &[String],
    ) -> Result<Vec<Order>> {
        let body = json_wire::encode_orders(orders, report_emails)?;
        info!(
            orders = orders.len(),
            report_emails = report_emails.len(),
            "submitting shipment orders"
        );

        let response = self
            .get_transport()?
            .post(self.transport.url(ORDERS_PATH))
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::BAD_REQUEST {
            let rejection = json_wire::decode_rejection(&body)?;
            warn!(errors = rejection.errors.len(), "shipment orders rejected");
            return Err(rejection.into());
        }

        let accepted = json_wire::decode_orders(&body)?;
        info!(accepted = accepted.len(), "shipment orders accepted");
        Ok(accepted)
    }

    async fn labels(&self, format: LabelFormat, barcodes: &[String]) -> Result<Bytes> {
        let mut query = vec![("format", format.as_str())];
        query.extend(barcodes.iter().map(|barcode| ("barcode", barcode.as_str())));
        debug!(%format, barcodes = barcodes.len(), "requesting labels");

        let response = self
            .get_transport()?
            .get(self.transport.url(LABELS_PATH))
            .query(&query)
            .send()
            .await?;
        read_labels(response).await
    }

    fn close(&self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn construction_does_not_connect() {
        let client = Client::new("key-123").unwrap();
        assert_eq!(client.base_url(), JSON_API_BASE_URL);
        assert!(!client.transport.is_open());
    }

    #[test]
    fn transport_is_reused_until_closed() {
        let client = Client::new("key-123").unwrap();
        client.get_transport().unwrap();
        assert!(client.transport.is_open());
        client.close();
        assert!(!client.transport.is_open());
        client.get_transport().unwrap();
        assert!(client.transport.is_open());
    }

    #[test]
    fn invalid_api_key_is_a_config_error() {
        let err = Client::new("bad\r\nkey").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn api_key_is_not_in_debug_output() {
        let client = Client::new("very-secret-key").unwrap();
        assert!(!format!("{client:?}").contains("very-secret-key"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = Client::with_config(
            "key",
            ClientConfig::default().with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let err = client.fi_terminals().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
