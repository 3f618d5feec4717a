// Lazily built HTTP client shared by every request of one API client
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

pub(crate) struct Transport {
    base_url: String,
    config: ClientConfig,
    headers: HeaderMap,
    client: Mutex<Option<reqwest::Client>>,
}

impl Transport {
    /// No I/O happens until the first call to [`Transport::get`].
    pub(crate) fn new(config: ClientConfig, default_base_url: &str) -> Self {
        Self {
            base_url: config.resolve_base_url(default_base_url),
            config,
            headers: HeaderMap::new(),
            client: Mutex::new(None),
        }
    }

    pub(crate) fn with_header(
        mut self,
        name: HeaderName,
        value: &str,
        sensitive: bool,
    ) -> Result<Self> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::Config(format!("invalid value for header {name}: {e}")))?;
        value.set_sensitive(sensitive);
        self.headers.insert(name, value);
        Ok(self)
    }

    pub(crate) fn with_json_content(self) -> Result<Self> {
        self.with_header(CONTENT_TYPE, "application/json", false)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the memoized client, building it on first use. Concurrent first
    /// callers end up with the same instance.
    pub(crate) fn get(&self) -> Result<reqwest::Client> {
        let mut guard = self.client.lock();
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        // rustls offers h2 and http/1.1 over ALPN
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(self.config.connect_timeout)
            .read_timeout(self.config.read_timeout)
            .user_agent(self.config.user_agent.as_str())
            .default_headers(self.headers.clone())
            .build()?;
        debug!(
            base_url = %self.base_url,
            read_timeout_ms = self.config.read_timeout.as_millis() as u64,
            "built HTTP transport"
        );
        *guard = Some(client.clone());
        Ok(client)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.client.lock().is_some()
    }

    /// Drops the memoized client and its connection pool. The next request
    /// builds a fresh one.
    pub(crate) fn close(&self) {
        if self.client.lock().take().is_some() {
            debug!(base_url = %self.base_url, "closed HTTP transport");
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("open", &self.is_open())
            .finish()
    }
}
