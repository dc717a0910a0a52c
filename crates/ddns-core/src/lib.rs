// # ddns-core
//
// Core library for the polling DDNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for discovering the caller's public IPv4 address
// - **DnsProvider**: Trait for reading and updating the published A-record
// - **DdnsEngine**: Reconciles the two once per tick, on a fixed interval
// - **ProviderRegistry**: Plugin-based registry for providers and IP sources
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from provider APIs
// 2. **Provider-Agnostic**: The engine never knows which provider it talks to
// 3. **Immutable Configuration**: Built once, moved into the engine
// 4. **Write on Drift Only**: No update call when the record already matches

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, PublishedRecord};
pub use engine::{DdnsEngine, EngineEvent, TickOutcome, TickStage};
pub use registry::ProviderRegistry;
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, ProviderConfig};
pub use error::{Error, Result};
