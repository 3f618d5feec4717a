// Synchronous facade over either async client.
//
// Owns a current-thread Tokio runtime and drives the async client with
// `block_on`. Must not be used from inside another async runtime.
use bytes::Bytes;
use tokio::runtime::{Builder, Runtime};

use crate::client::ParcelApi;
use crate::error::Result;
use crate::models::{Country, LabelFormat, PlaceFilter, ShipmentOrder, TerminalType};

pub struct BlockingClient<C: ParcelApi> {
    inner: C,
    runtime: Runtime,
}

impl<C: ParcelApi> BlockingClient<C> {
    pub fn new(inner: C) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// The wrapped async client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn terminals(
        &self,
        country: Country,
        kind: TerminalType,
        filter: Option<PlaceFilter>,
    ) -> Result<Vec<C::Place>> {
        self.runtime
            .block_on(self.inner.terminals(country, kind, filter))
    }

    pub fn submit_orders(
        &self,
        orders: &[ShipmentOrder],
        report_emails: &[String],
    ) -> Result<Vec<C::Confirmation>> {
        self.runtime
            .block_on(self.inner.submit_orders(orders, report_emails))
    }

    pub fn labels(&self, format: LabelFormat, barcodes: &[String]) -> Result<Bytes> {
        self.runtime.block_on(self.inner.labels(format, barcodes))
    }

    pub fn ee_terminals(&self) -> Result<Vec<C::Place>> {
        self.runtime.block_on(self.inner.ee_terminals())
    }

    pub fn ee_express_terminals(&self) -> Result<Vec<C::Place>> {
        self.runtime.block_on(self.inner.ee_express_terminals())
    }

    pub fn fi_terminals(&self) -> Result<Vec<C::Place>> {
        self.runtime.block_on(self.inner.fi_terminals())
    }

    pub fn fi_post_offices(&self) -> Result<Vec<C::Place>> {
        self.runtime.block_on(self.inner.fi_post_offices())
    }

    pub fn close(&self) {
        self.inner.close();
    }
}
