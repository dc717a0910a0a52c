//! Core traits for the DDNS system
//!
//! - [`IpSource`]: Discover the caller's public IPv4 address
//! - [`DnsProvider`]: Read and write the published A-record

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, IpSourceFactory};
pub use dns_provider::{DnsProvider, DnsProviderFactory, PublishedRecord};
