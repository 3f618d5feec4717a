// Async client for the legacy XML API at iseteenindus.smartpost.ee
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::client::{read_labels, ParcelApi};
use crate::config::{ClientConfig, XML_API_BASE_URL};
use crate::error::Result;
use crate::models::{
    Country, Destination, LabelFormat, OrderInfo, PlaceFilter, ShipmentOrder, TerminalType,
};
use crate::transport::Transport;
use crate::xml_wire::{self, Credentials};

const XML_CONTENT_TYPE: &str = "application/xml";

/// Client for the XML API. Credentials travel in each request body, the
/// transport carries no auth headers.
#[derive(Debug)]
pub struct LegacyClient {
    credentials: Credentials,
    transport: Transport,
}

impl LegacyClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_config(username, password, ClientConfig::default())
    }

    pub fn with_config(
        username: impl Into<String>,
        password: impl Into<String>,
        config: ClientConfig,
    ) -> Self {
        Self {
            credentials: Credentials::new(username, password),
            transport: Transport::new(config, XML_API_BASE_URL),
        }
    }

    /// The memoized HTTP client, built on first use.
    pub fn get_transport(&self) -> Result<reqwest::Client> {
        self.transport.get()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    async fn post_document(&self, request: &str, body: Vec<u8>) -> Result<reqwest::Response> {
        let response = self
            .get_transport()?
            .post(self.transport.url("/"))
            .query(&[("request", request)])
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl ParcelApi for LegacyClient {
    type Place = Destination;
    type Confirmation = OrderInfo;

    async fn terminals(
        &self,
        country: Country,
        kind: TerminalType,
        filter: Option<PlaceFilter>,
    ) -> Result<Vec<Destination>> {
        let mut query = vec![
            ("request", "destinations"),
            ("country", country.as_str()),
            ("type", kind.as_str()),
        ];
        if let Some(filter) = filter {
            query.push(("filter", filter.as_str()));
        }
        debug!(%country, kind = %kind, ?filter, "listing destinations");

        let response = self
            .get_transport()?
            .get(self.transport.url("/"))
            .query(&query)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let destinations = xml_wire::decode_destinations(&body)?;
        debug!(count = destinations.len(), "decoded destinations");
        Ok(destinations)
    }

    async fn submit_orders(
        &self,
        orders: &[ShipmentOrder],
        report_emails: &[String],
    ) -> Result<Vec<OrderInfo>> {
        let body = xml_wire::encode_orders(&self.credentials, orders, report_emails)?;
        info!(
            orders = orders.len(),
            report_emails = report_emails.len(),
            "submitting shipment orders"
        );

        let response = self.post_document("shipment", body).await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::BAD_REQUEST {
            let rejection = xml_wire::decode_rejection(&body)?;
            warn!(errors = rejection.errors.len(), "shipment orders rejected");
            return Err(rejection.into());
        }

        let accepted = xml_wire::decode_order_infos(&body)?;
        info!(accepted = accepted.len(), "shipment orders accepted");
        Ok(accepted)
    }

    async fn labels(&self, format: LabelFormat, barcodes: &[String]) -> Result<Bytes> {
        let body = xml_wire::encode_labels_request(&self.credentials, format, barcodes)?;
        debug!(%format, barcodes = barcodes.len(), "requesting labels");
        let response = self.post_document("labels", body).await?;
        read_labels(response).await
    }

    fn close(&self) {
        self.transport.close();
    }
}
