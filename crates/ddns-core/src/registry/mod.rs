//! Plugin-based provider registry
//!
//! The registry maps provider and IP source type names to factories, so
//! the daemon builds whatever the configuration names without a
//! hard-coded if-else chain.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::ProviderRegistry;
//!
//! let mut registry = ProviderRegistry::new();
//! ddns_provider_cloudflare::register(&mut registry);
//! ddns_ip_http::register(&mut registry);
//!
//! let provider = registry.create_provider(&config.provider)?;
//! let ip_source = registry.create_ip_source(&config.ip_source)?;
//! ```

use crate::config::{IpSourceConfig, ProviderConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory, IpSource, IpSourceFactory};
use std::collections::HashMap;

/// Provider registry for plugin-based component creation
///
/// Registration happens once during startup, before the engine exists,
/// so the registry takes `&mut self` and needs no locking.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: HashMap<String, Box<dyn DnsProviderFactory>>,

    /// Registered IP source factories
    ip_sources: HashMap<String, Box<dyn IpSourceFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under `name` (e.g. "cloudflare")
    pub fn register_provider(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn DnsProviderFactory>,
    ) {
        self.providers.insert(name.into(), factory);
    }

    /// Register an IP source factory under `name` (e.g. "http")
    pub fn register_ip_source(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn IpSourceFactory>,
    ) {
        self.ip_sources.insert(name.into(), factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        let provider_type = config.type_name();

        let factory = self
            .providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// Create an IP source from configuration
    pub fn create_ip_source(&self, config: &IpSourceConfig) -> Result<Box<dyn IpSource>> {
        let source_type = config.type_name();

        let factory = self
            .ip_sources
            .get(source_type)
            .ok_or_else(|| Error::config(format!("Unknown IP source type: {}", source_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Check if an IP source type is registered
    pub fn has_ip_source(&self, name: &str) -> bool {
        self.ip_sources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl DnsProviderFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
            Err(Error::config("Mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = ProviderRegistry::new();

        assert!(!registry.has_provider("cloudflare"));

        registry.register_provider("cloudflare", Box::new(MockProviderFactory));

        assert!(registry.has_provider("cloudflare"));
        assert_eq!(registry.list_providers(), vec!["cloudflare".to_string()]);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig::GoDaddy {
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
            domain: "example.com".to_string(),
            subdomain: "@".to_string(),
        };

        match registry.create_provider(&config) {
            Err(Error::Config(msg)) => assert!(msg.contains("godaddy")),
            Err(other) => panic!("Expected config error, got {:?}", other),
            Ok(_) => panic!("Expected config error, got a provider"),
        }
    }

    #[test]
    fn test_unknown_ip_source_is_config_error() {
        let registry = ProviderRegistry::new();
        assert!(!registry.has_ip_source("http"));
        assert!(registry.create_ip_source(&IpSourceConfig::default()).is_err());
    }
}
