//! Configuration types for the DDNS system
//!
//! A [`DdnsConfig`] is built once at startup and moved into the engine;
//! nothing reads or writes process-wide settings afterwards.

use serde::{Deserialize, Serialize};

/// Default IP echo endpoint (plain-text body holding the caller's IPv4 address)
pub const DEFAULT_IP_URL: &str = "http://v4.ident.me/";

/// Default timeout for the IP echo request
pub const DEFAULT_IP_TIMEOUT_SECS: u64 = 10;

/// Default poll interval between reconcile ticks
pub const DEFAULT_INTERVAL_SECS: u64 = 360;

/// Record name that designates the zone apex
pub const APEX_RECORD_NAME: &str = "@";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a configuration for `provider` with default IP source and engine settings
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            ip_source: IpSourceConfig::default(),
            provider,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// IP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSourceConfig {
    /// HTTP echo service returning the caller's address as plain text
    Http {
        /// URL to fetch the IP from
        url: String,
        /// Request timeout in seconds
        #[serde(default = "default_ip_timeout_secs")]
        timeout_secs: u64,
    },
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            IpSourceConfig::Http { url, timeout_secs } => {
                if url.is_empty() {
                    return Err(crate::Error::config("HTTP IP source URL cannot be empty"));
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "HTTP IP source URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("HTTP IP source timeout must be > 0"));
                }
                Ok(())
            }
        }
    }

    /// Get the IP source type name
    pub fn type_name(&self) -> &str {
        match self {
            IpSourceConfig::Http { .. } => "http",
        }
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        IpSourceConfig::Http {
            url: DEFAULT_IP_URL.to_string(),
            timeout_secs: DEFAULT_IP_TIMEOUT_SECS,
        }
    }
}

/// DNS provider configuration
///
/// `Debug` is implemented by hand so credentials never reach a log line.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider (bearer token auth)
    Cloudflare {
        /// Cloudflare API token
        api_token: String,
        /// Zone ID holding the record
        zone_id: String,
        /// Record name sent in updates (`@` for the apex)
        #[serde(default = "default_record_name")]
        record_name: String,
        /// Domain used to narrow the record lookup (optional)
        #[serde(default)]
        domain: Option<String>,
    },

    /// GoDaddy provider (`sso-key` auth)
    #[serde(rename = "godaddy")]
    GoDaddy {
        /// GoDaddy API key
        api_key: String,
        /// GoDaddy API secret
        api_secret: String,
        /// Domain holding the record (e.g. "example.com")
        domain: String,
        /// Record name (`@` for the apex)
        #[serde(default = "default_record_name")]
        subdomain: String,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Cloudflare {
                api_token,
                zone_id,
                record_name,
                domain,
            } => {
                if api_token.is_empty() {
                    return Err(crate::Error::config(
                        "You need to provide your cloudFlare TOKEN",
                    ));
                }
                if zone_id.is_empty() {
                    return Err(crate::Error::config(
                        "You need to provide your cloudFlare Zone id",
                    ));
                }
                if record_name.is_empty() {
                    return Err(crate::Error::config("Record name cannot be empty"));
                }
                // Without a domain the lookup cannot be narrowed to the named record
                if record_name != APEX_RECORD_NAME && domain.as_deref().is_none_or(str::is_empty) {
                    return Err(crate::Error::config(format!(
                        "You need to provide your domain to manage record {}",
                        record_name
                    )));
                }
                Ok(())
            }
            ProviderConfig::GoDaddy {
                api_key,
                api_secret,
                domain,
                subdomain,
            } => {
                if api_key.is_empty() {
                    return Err(crate::Error::config("You need to provide your GoDaddy key"));
                }
                if api_secret.is_empty() {
                    return Err(crate::Error::config(
                        "You need to provide your GoDaddy secret",
                    ));
                }
                if domain.is_empty() {
                    return Err(crate::Error::config(
                        "You need to provide your domain (e.g., example.com)",
                    ));
                }
                if subdomain.is_empty() {
                    return Err(crate::Error::config("Subdomain cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
            ProviderConfig::GoDaddy { .. } => "godaddy",
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Cloudflare {
                zone_id,
                record_name,
                domain,
                ..
            } => f
                .debug_struct("Cloudflare")
                .field("api_token", &"<REDACTED>")
                .field("zone_id", zone_id)
                .field("record_name", record_name)
                .field("domain", domain)
                .finish(),
            ProviderConfig::GoDaddy {
                domain, subdomain, ..
            } => f
                .debug_struct("GoDaddy")
                .field("api_key", &"<REDACTED>")
                .field("api_secret", &"<REDACTED>")
                .field("domain", domain)
                .field("subdomain", subdomain)
                .finish(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds to sleep between reconcile ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Capacity of the engine event channel
    ///
    /// When full, events are dropped with a warning.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Interval must be at least 1 second"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_record_name() -> String {
    APEX_RECORD_NAME.to_string()
}

fn default_ip_timeout_secs() -> u64 {
    DEFAULT_IP_TIMEOUT_SECS
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_event_channel_capacity() -> usize {
    100
}
