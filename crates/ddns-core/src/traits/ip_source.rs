// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let observed = source.current().await?;
//     println!("public address: {}", observed);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for IP source implementations
///
/// An IP source answers one question per call: what is the caller's
/// public IPv4 address right now. It is queried once per reconcile tick.
///
/// ## Rules
///
/// - One lookup per call, bounded by the implementation's own timeout
/// - No caching between calls (every tick observes fresh state)
/// - No retry; a failure is returned and the engine ends the tick
/// - No decisions about whether DNS needs updating
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The observed address
    /// - `Err(Error::Network)`: Transport failure, timeout or non-2xx status
    /// - `Err(Error::IpSource)`: The answer was not an IPv4 address
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing IP sources from configuration
pub trait IpSourceFactory: Send + Sync {
    /// Create an IpSource instance from configuration
    fn create(
        &self,
        config: &crate::config::IpSourceConfig,
    ) -> Result<Box<dyn IpSource>, crate::Error>;
}
