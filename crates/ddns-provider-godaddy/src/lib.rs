// # GoDaddy DNS Provider
//
// This crate provides the GoDaddy implementation of `DnsProvider`.
//
// ## Behavior
//
// - GET `domains/{domain}/records/A/{subdomain}` to read, PUT
//   `domains/{domain}/records/A` to write
// - `Authorization: sso-key {key}:{secret}` on every request
// - 5 second timeout on every request
// - GoDaddy records carry no ID; the record is addressed by name
// - Write succeeds only on HTTP 200; anything else is `Error::UpdateFailed`
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or `Debug` output
//
// ## API Reference
//
// - GoDaddy Domains API: https://developer.godaddy.com/doc/endpoint/domains

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::{DnsProvider, DnsProviderFactory, PublishedRecord};
use ddns_core::{Error, ProviderRegistry, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Production API base URL
pub const GODADDY_API_BASE: &str = "https://api.godaddy.com/v1";

/// OTE (test environment) API base URL
pub const GODADDY_OTE_API_BASE: &str = "https://api.ote-godaddy.com/v1";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// TTL written with every update
const RECORD_TTL: u32 = 600;

const PROVIDER_NAME: &str = "godaddy";

/// One element of the record array, both read and written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GdRecord {
    pub name: String,
    pub data: String,
    pub ttl: u32,
}

/// Error body returned by the Domains API on non-2xx answers
#[derive(Debug, Deserialize)]
struct GdApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// GoDaddy DNS provider
pub struct GoDaddyProvider {
    /// ⚠️ NEVER log this value
    api_key: String,

    /// ⚠️ NEVER log this value
    api_secret: String,

    domain: String,
    subdomain: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("subdomain", &self.subdomain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a new GoDaddy provider against the production API
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        domain: impl Into<String>,
        subdomain: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(Error::config("GoDaddy API key and secret cannot be empty"));
        }

        let domain = domain.into();
        if domain.is_empty() {
            return Err(Error::config("GoDaddy domain cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_secret,
            domain,
            subdomain: subdomain.into(),
            base_url: GODADDY_API_BASE.to_string(),
            client,
        })
    }

    /// Point the provider at a different API base URL (e.g. the OTE environment)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth_header(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }

    fn lookup_url(&self) -> String {
        format!(
            "{}/domains/{}/records/A/{}",
            self.base_url, self.domain, self.subdomain
        )
    }

    fn update_url(&self) -> String {
        format!("{}/domains/{}/records/A", self.base_url, self.domain)
    }

    /// Build the PUT body pointing the record at `new_ip`
    pub fn update_request(&self, new_ip: Ipv4Addr) -> Vec<GdRecord> {
        vec![GdRecord {
            name: self.subdomain.clone(),
            data: new_ip.to_string(),
            ttl: RECORD_TTL,
        }]
    }
}

/// Interpret the answer to a record lookup
fn parse_lookup(status: u16, body: &str) -> Result<PublishedRecord> {
    if !(200..300).contains(&status) {
        let message = match serde_json::from_str::<GdApiError>(body) {
            Ok(api) if !api.message.is_empty() => {
                format!("HTTP {}: {} ({})", status, api.message, api.code)
            }
            _ => format!("HTTP {}", status),
        };
        return Err(Error::provider(PROVIDER_NAME, message));
    }

    let records: Vec<GdRecord> = serde_json::from_str(body).map_err(|e| {
        Error::lookup_failed(format!("Failed to decode GoDaddy response: {}", e))
    })?;

    let record = records
        .into_iter()
        .next()
        .ok_or_else(|| Error::lookup_failed("No A record found for subdomain"))?;

    Ok(PublishedRecord {
        id: None,
        name: record.name,
        content: record.data,
        ttl: Some(record.ttl),
    })
}

/// Interpret the status of a record update
fn check_update(status: u16) -> Result<()> {
    if status == 200 {
        Ok(())
    } else {
        Err(Error::update_failed(PROVIDER_NAME, status))
    }
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    async fn get_record(&self) -> Result<PublishedRecord> {
        let url = self.lookup_url();
        tracing::debug!("Looking up GoDaddy A record: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| Error::network(format!("GoDaddy request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read GoDaddy response: {}", e)))?;

        parse_lookup(status, &body)
    }

    async fn update_record(&self, _record: &PublishedRecord, new_ip: Ipv4Addr) -> Result<()> {
        let payload = self.update_request(new_ip);

        tracing::info!(
            "Updating GoDaddy DNS record: {}.{} -> {}",
            self.subdomain,
            self.domain,
            new_ip
        );

        let response = self
            .client
            .put(self.update_url())
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("GoDaddy request failed: {}", e)))?;

        check_update(response.status().as_u16())?;

        tracing::info!("DNS record updated successfully: {} -> {}", self.subdomain, new_ip);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating GoDaddy providers
pub struct GoDaddyFactory;

impl DnsProviderFactory for GoDaddyFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::GoDaddy {
                api_key,
                api_secret,
                domain,
                subdomain,
            } => Ok(Box::new(GoDaddyProvider::new(
                api_key.clone(),
                api_secret.clone(),
                domain.clone(),
                subdomain.clone(),
            )?)),
            _ => Err(Error::config("Invalid config for GoDaddy provider")),
        }
    }
}

/// Register the GoDaddy provider with a registry
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(GoDaddyFactory));
}

#[cfg(test)]
mod test_server;
