//! Test doubles and common utilities for contract tests
//!
//! The doubles count every call so tests can assert which side effects
//! a tick produced.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, PublishedRecord};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// An IpSource that returns a fixed address, or fails with a network error
pub struct MockIpSource {
    /// Address to return; `None` simulates a timeout
    ip: Option<Ipv4Addr>,
    /// Time each lookup takes
    delay: Option<Duration>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
}

impl MockIpSource {
    /// A source that always observes `ip`
    pub fn returning(ip: Ipv4Addr) -> Self {
        Self {
            ip: Some(ip),
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose request always times out
    pub fn timing_out() -> Self {
        Self {
            ip: None,
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every lookup take `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Create a new MockIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            delay: other.delay,
            call_count: Arc::clone(&other.call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.ip
            .ok_or_else(|| Error::network("operation timed out"))
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// How the mock provider answers get_record()
#[derive(Debug, Clone)]
pub enum ReadBehavior {
    /// Return this record
    Record(PublishedRecord),
    /// The provider answered `success: false`
    Unsuccessful,
    /// The provider answered with an empty result set
    Empty,
}

/// How the mock provider answers update_record()
#[derive(Debug, Clone, Copy)]
pub enum WriteBehavior {
    /// HTTP 200 with a truthy success flag
    Accept,
    /// Any other status
    Reject(u16),
}

/// A mock DnsProvider that tracks calls
pub struct MockDnsProvider {
    read: ReadBehavior,
    write: WriteBehavior,
    /// Call counter for get_record()
    read_call_count: Arc<AtomicUsize>,
    /// Call counter for update_record()
    update_call_count: Arc<AtomicUsize>,
    /// Recorded (record id, new ip) pairs from update calls
    updates: Arc<std::sync::Mutex<Vec<(Option<String>, Ipv4Addr)>>>,
}

impl MockDnsProvider {
    pub fn new(read: ReadBehavior, write: WriteBehavior) -> Self {
        Self {
            read,
            write,
            read_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// A provider publishing `content` under record id `id`, accepting updates
    pub fn publishing(id: &str, content: &str) -> Self {
        Self::new(
            ReadBehavior::Record(published(Some(id), content)),
            WriteBehavior::Accept,
        )
    }

    /// Get the number of times get_record() was called
    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded update calls
    pub fn updates(&self) -> Vec<(Option<String>, Ipv4Addr)> {
        self.updates.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            read: other.read.clone(),
            write: other.write,
            read_call_count: Arc::clone(&other.read_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            updates: Arc::clone(&other.updates),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_record(&self) -> Result<PublishedRecord> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.read {
            ReadBehavior::Record(record) => Ok(record.clone()),
            ReadBehavior::Unsuccessful => Err(Error::provider("mock", "get dns record error")),
            ReadBehavior::Empty => Err(Error::lookup_failed("no A record in result set")),
        }
    }

    async fn update_record(&self, record: &PublishedRecord, new_ip: Ipv4Addr) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updates
            .lock()
            .unwrap()
            .push((record.id.clone(), new_ip));

        match self.write {
            WriteBehavior::Accept => Ok(()),
            WriteBehavior::Reject(status) => Err(Error::update_failed("mock", status)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Build a published apex record
pub fn published(id: Option<&str>, content: &str) -> PublishedRecord {
    PublishedRecord {
        id: id.map(str::to_string),
        name: "@".to_string(),
        content: content.to_string(),
        ttl: Some(3600),
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(interval_secs: u64) -> ddns_core::config::DdnsConfig {
    let mut config = ddns_core::config::DdnsConfig::new(
        ddns_core::config::ProviderConfig::Cloudflare {
            api_token: "test-token".to_string(),
            zone_id: "test-zone".to_string(),
            record_name: "@".to_string(),
            domain: None,
        },
    );
    config.engine.interval_secs = interval_secs;
    config
}
