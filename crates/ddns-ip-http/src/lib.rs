// # HTTP IP Source
//
// This crate provides the IP resolver for the DDNS system: one GET to a
// public "what is my IP" endpoint per reconcile tick.
//
// ## Behavior
//
// - Bounded timeout (10 seconds by default)
// - Non-2xx answers and transport failures are `Error::Network`
// - The body is trimmed and must parse as an IPv4 address
// - No caching and no retry: the engine asks again on the next tick

use ddns_core::ProviderRegistry;
use ddns_core::config::{DEFAULT_IP_TIMEOUT_SECS, IpSourceConfig};
use ddns_core::traits::{IpSource, IpSourceFactory};
use ddns_core::{Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

/// HTTP-based IP source
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source with the default 10 second timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP from (e.g., "http://v4.ident.me/")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_IP_TIMEOUT_SECS))
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Fetch the current IP from the echo service
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} answered with HTTP status {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        parse_ipv4(&body)
    }
}

/// Parse the echo service body into an IPv4 address
///
/// Surrounding whitespace (typically a trailing newline) is ignored.
pub fn parse_ipv4(body: &str) -> Result<Ipv4Addr> {
    let text = body.trim();
    text.parse()
        .map_err(|_| Error::ip_source(format!("Invalid IPv4 address: {:?}", text)))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

impl std::fmt::Debug for HttpIpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIpSource").field("url", &self.url).finish()
    }
}

/// Factory for creating HTTP IP sources
pub struct HttpFactory;

impl IpSourceFactory for HttpFactory {
    fn create(&self, config: &IpSourceConfig) -> Result<Box<dyn IpSource>> {
        match config {
            IpSourceConfig::Http { url, timeout_secs } => {
                if url.is_empty() {
                    return Err(Error::config("HTTP IP source URL cannot be empty"));
                }

                tracing::debug!("Creating HTTP IP source (url={})", url);
                Ok(Box::new(HttpIpSource::with_timeout(
                    url.clone(),
                    Duration::from_secs(*timeout_secs),
                )?))
            }
        }
    }
}

/// Register the HTTP IP source with a registry
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_ip_source("http", Box::new(HttpFactory));
}
