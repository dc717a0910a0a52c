// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of `DnsProvider`.
//
// ## Behavior
//
// - One HTTP request per trait call (GET to read, PATCH to write)
// - 5 second timeout on every request
// - Read fails with `Error::Provider` when the envelope says `success: false`,
//   and with `Error::LookupFailed` when the result set is empty
// - Write succeeds only on HTTP 200 with `success: true`; anything else is
//   `Error::UpdateFailed`
// - No retry, no backoff, no caching between ticks
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::config::{APEX_RECORD_NAME, ProviderConfig};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, PublishedRecord};
use ddns_core::{Error, ProviderRegistry, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (5 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// TTL written with every update
const RECORD_TTL: u32 = 3600;

const PROVIDER_NAME: &str = "cloudflare";

/// Response envelope shared by every Cloudflare v4 endpoint
#[derive(Debug, Deserialize)]
struct CfEnvelope<T> {
    result: Option<T>,
    success: bool,
    #[serde(default)]
    errors: Vec<CfApiError>,
}

#[derive(Debug, Deserialize)]
struct CfApiError {
    #[serde(default)]
    code: i64,
    message: String,
}

/// A DNS record as listed by `GET /zones/:zone_id/dns_records`
#[derive(Debug, Deserialize)]
struct CfRecord {
    id: String,
    #[serde(default)]
    name: String,
    content: String,
    #[serde(default)]
    ttl: Option<u32>,
}

/// Body of `PATCH /zones/:zone_id/dns_records/:record_id`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CfUpdateRequest {
    pub content: String,
    pub name: String,
    pub proxied: bool,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub ttl: u32,
}

/// Cloudflare DNS provider
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone ID holding the record
    zone_id: String,

    /// Record name sent in updates (`@` for the apex)
    record_name: String,

    /// Domain used to narrow the lookup to a single name
    domain: Option<String>,

    /// API base URL, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone holding the record
    /// - `record_name`: Name written into updates (`@` for the apex)
    /// - `domain`: Optional domain; when set, the lookup is filtered by the
    ///   record's fully qualified name
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
        domain: Option<String>,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let zone_id = zone_id.into();
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            record_name: record_name.into(),
            domain,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fully qualified name of the managed record, if the domain is known
    fn lookup_name(&self) -> Option<String> {
        let domain = self.domain.as_deref()?;

        if self.record_name == APEX_RECORD_NAME || self.record_name == domain {
            Some(domain.to_string())
        } else if self.record_name.ends_with(&format!(".{}", domain)) {
            Some(self.record_name.clone())
        } else {
            Some(format!("{}.{}", self.record_name, domain))
        }
    }

    /// URL of the zone's record collection
    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    /// Query parameters of the record lookup
    fn lookup_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("type", "A".to_string())];
        if let Some(name) = self.lookup_name() {
            query.push(("name", name));
        }
        query
    }

    /// URL of the record update
    fn update_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Build the PATCH body pointing the record at `new_ip`
    pub fn update_request(&self, new_ip: Ipv4Addr) -> CfUpdateRequest {
        CfUpdateRequest {
            content: new_ip.to_string(),
            name: self.record_name.clone(),
            proxied: false,
            record_type: "A".to_string(),
            comment: None,
            tags: None,
            ttl: RECORD_TTL,
        }
    }
}

/// Interpret the body of a record lookup
fn parse_lookup(status: u16, body: &str) -> Result<PublishedRecord> {
    let envelope: CfEnvelope<Vec<CfRecord>> = serde_json::from_str(body).map_err(|e| {
        Error::lookup_failed(format!(
            "Failed to decode Cloudflare response (HTTP {}): {}",
            status, e
        ))
    })?;

    if !envelope.success {
        let details: Vec<String> = envelope
            .errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect();
        let message = if details.is_empty() {
            "get dns record error".to_string()
        } else {
            format!("get dns record error: {}", details.join(", "))
        };
        return Err(Error::provider(PROVIDER_NAME, message));
    }

    let record = envelope
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| Error::lookup_failed("No A record found in zone"))?;

    Ok(PublishedRecord {
        id: Some(record.id),
        name: record.name,
        content: record.content,
        ttl: record.ttl,
    })
}

/// Interpret the answer to a record update
fn check_update(status: u16, body: &str) -> Result<()> {
    let success = serde_json::from_str::<CfEnvelope<serde_json::Value>>(body)
        .map(|envelope| envelope.success)
        .unwrap_or(false);

    if status == 200 && success {
        Ok(())
    } else {
        Err(Error::update_failed(PROVIDER_NAME, status))
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn get_record(&self) -> Result<PublishedRecord> {
        let query = self.lookup_query();
        tracing::debug!(
            "Looking up Cloudflare A record in zone {}: {:?}",
            self.zone_id,
            query
        );

        let response = self
            .client
            .get(self.records_url())
            .query(&query)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::network(format!("Cloudflare request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read Cloudflare response: {}", e)))?;

        let record = parse_lookup(status, &body)?;
        tracing::debug!("Found record ID: {}", record.id.as_deref().unwrap_or_default());
        Ok(record)
    }

    async fn update_record(&self, record: &PublishedRecord, new_ip: Ipv4Addr) -> Result<()> {
        let record_id = record
            .id
            .as_deref()
            .ok_or_else(|| Error::lookup_failed("Cloudflare record has no ID"))?;

        let url = self.update_url(record_id);
        let payload = self.update_request(new_ip);

        tracing::info!(
            "Updating Cloudflare DNS record: {} -> {} (record ID: {})",
            self.record_name,
            new_ip,
            record_id
        );

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("Cloudflare request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        check_update(status, &body)?;

        tracing::info!("DNS record updated successfully: {} -> {}", self.record_name, new_ip);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudflare {
                api_token,
                zone_id,
                record_name,
                domain,
            } => Ok(Box::new(CloudflareProvider::new(
                api_token.clone(),
                zone_id.clone(),
                record_name.clone(),
                domain.clone(),
            )?)),
            _ => Err(Error::config("Invalid config for Cloudflare provider")),
        }
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let mut registry = ProviderRegistry::new();
/// ddns_provider_cloudflare::register(&mut registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(CloudflareFactory));
}

#[cfg(test)]
mod test_server;
