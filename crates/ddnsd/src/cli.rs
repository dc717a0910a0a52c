//! Command line interface
//!
//! Credentials may also come from the environment so they stay out of `ps`
//! output: `DDNS_KEY`, `DDNS_TOKEN`, `DDNS_SECRET`, `DDNS_ZONE_ID`.

use clap::{Parser, ValueEnum};
use ddns_core::config::{APEX_RECORD_NAME, DEFAULT_IP_URL};
use ddns_core::{DdnsConfig, IpSourceConfig, ProviderConfig};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Supported DNS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Cloudflare,
    Godaddy,
}

#[derive(Debug, Parser)]
#[command(
    name = "ddnsd",
    about = "Keep a DNS A record pointed at this host's public IPv4 address",
    disable_version_flag = true
)]
pub struct Args {
    /// DNS provider holding the record
    #[arg(long, value_enum, default_value = "cloudflare")]
    pub provider: ProviderKind,

    /// Cloudflare API token, or GoDaddy API key
    #[arg(long, env = "DDNS_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Cloudflare API token
    #[arg(long, env = "DDNS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GoDaddy API secret
    #[arg(long, env = "DDNS_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Domain, e.g. example.com
    #[arg(long)]
    pub domain: Option<String>,

    /// Record name, `@` for the apex
    #[arg(long, default_value = APEX_RECORD_NAME)]
    pub subdomain: String,

    /// Cloudflare zone id
    #[arg(long = "zoneid", env = "DDNS_ZONE_ID")]
    pub zone_id: Option<String>,

    /// Seconds between checks
    #[arg(long, default_value_t = ddns_core::config::DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Check once and exit
    #[arg(long)]
    pub once: bool,

    /// Accepted for compatibility; run under a service manager instead
    #[arg(short = 'd', long)]
    pub daemon: bool,

    /// Endpoint answering with the caller's IPv4 address as plain text
    #[arg(long, default_value = DEFAULT_IP_URL)]
    pub ip_url: String,

    /// Append-only log file
    #[arg(long, default_value = "./dnslog")]
    pub log_file: PathBuf,

    /// trace, debug, info, warn or error
    #[arg(long, default_value = "debug")]
    pub log_level: LevelFilter,

    /// Print version information and exit
    #[arg(short = 'v', long = "version")]
    pub print_version: bool,
}

impl Args {
    /// Build and validate the runtime configuration
    pub fn to_config(&self) -> ddns_core::Result<DdnsConfig> {
        let provider = match self.provider {
            ProviderKind::Cloudflare => ProviderConfig::Cloudflare {
                api_token: self
                    .token
                    .clone()
                    .or_else(|| self.key.clone())
                    .unwrap_or_default(),
                zone_id: self.zone_id.clone().unwrap_or_default(),
                record_name: self.subdomain.clone(),
                domain: self.domain.clone(),
            },
            ProviderKind::Godaddy => ProviderConfig::GoDaddy {
                api_key: self.key.clone().unwrap_or_default(),
                api_secret: self.secret.clone().unwrap_or_default(),
                domain: self.domain.clone().unwrap_or_default(),
                subdomain: self.subdomain.clone(),
            },
        };

        let mut config = DdnsConfig::new(provider);
        if let IpSourceConfig::Http { url, .. } = &mut config.ip_source {
            *url = self.ip_url.clone();
        }
        config.engine.interval_secs = self.interval;

        config.validate()?;
        Ok(config)
    }
}

/// Version line printed by `-v`
///
/// Git hash and build time are taken from `DDNS_GIT_HASH` and
/// `DDNS_BUILD_TIME` at compile time when the build sets them.
pub fn version_string() -> String {
    format!(
        "ddnsd {} (git {}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("DDNS_GIT_HASH").unwrap_or("unknown"),
        option_env!("DDNS_BUILD_TIME").unwrap_or("unknown"),
    )
}
