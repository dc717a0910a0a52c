// # DNS Provider Trait
//
// Defines the read and write half of a DNS provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
// - GoDaddy: `ddns-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let published = provider.get_record().await?;
//     provider
//         .update_record(&published, std::net::Ipv4Addr::new(203, 0, 113, 9))
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// The A-record currently published at the provider
///
/// Read fresh every tick. The `id` is kept only long enough to hand it
/// to the write call of the same tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    /// Provider record identifier; `None` when the provider addresses
    /// records by domain, type and name instead
    pub id: Option<String>,
    /// The record name as reported by the provider
    pub name: String,
    /// The record content, compared byte-for-byte with the observed address
    pub content: String,
    /// Time-to-live reported by the provider
    pub ttl: Option<u32>,
}

impl PublishedRecord {
    /// Whether the published content already equals the observed address
    pub fn matches(&self, observed: Ipv4Addr) -> bool {
        self.content == observed.to_string()
    }
}

/// Trait for DNS provider implementations
///
/// The configured domain, record name and credentials live inside the
/// implementation; the engine stays provider-agnostic.
///
/// ## Rules
///
/// - One API call per method invocation
/// - No retry or backoff (the scheduler re-runs the whole tick)
/// - No decision about whether an update is needed (owned by `DdnsEngine`)
/// - Credentials never appear in logs or `Debug` output
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Read the A-record currently published for the configured name
    ///
    /// # Returns
    ///
    /// - `Ok(PublishedRecord)`: The record and its identifier
    /// - `Err(Error::Network)`: Transport failure or timeout
    /// - `Err(Error::Provider)`: The provider reported failure
    /// - `Err(Error::LookupFailed)`: Empty result set or undecodable answer
    async fn get_record(&self) -> Result<PublishedRecord, crate::Error>;

    /// Point the record at `new_ip`
    ///
    /// `record` is the value returned by `get_record` in the same tick.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the update
    /// - `Err(Error::UpdateFailed)`: Any status/flag combination other than success
    /// - `Err(Error::Network)`: Transport failure or timeout
    async fn update_record(
        &self,
        record: &PublishedRecord,
        new_ip: Ipv4Addr,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
