//! Error types for the DDNS system
//!
//! Resolver and reader errors end the current reconcile tick only.
//! Writer errors are escalated by the engine and stop the process.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, timeout, or a non-2xx answer from the IP echo service
    #[error("Network error: {0}")]
    Network(String),

    /// The IP echo service answered with something that is not an IPv4 address
    #[error("IP source error: {0}")]
    IpSource(String),

    /// The provider answered, but the record could not be found or decoded
    #[error("Record lookup failed: {0}")]
    LookupFailed(String),

    /// The provider reported an unsuccessful lookup
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// A record update was rejected (non-200 status or `success: false`)
    #[error("Update failed ({provider}): HTTP status code {status}")]
    UpdateFailed {
        /// Provider name
        provider: String,
        /// HTTP status code returned by the update call
        status: u16,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a lookup error
    pub fn lookup_failed(msg: impl Into<String>) -> Self {
        Self::LookupFailed(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an update failure
    pub fn update_failed(provider: impl Into<String>, status: u16) -> Self {
        Self::UpdateFailed {
            provider: provider.into(),
            status,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must terminate the process rather than the tick
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UpdateFailed { .. })
    }
}
