//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Observing the caller's public IPv4 address via IpSource
//! - Reading the published A-record via DnsProvider
//! - Updating the record when the two differ
//! - Repeating the above on a fixed interval
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    observed     ┌──────────────┐    published    ┌─────────────┐
//! │  IpSource   │ ──────────────▶ │  DdnsEngine  │ ◀────────────── │ DnsProvider │
//! └─────────────┘                 └──────────────┘                 └─────────────┘
//!                                         │          update on drift       ▲
//!                                         └────────────────────────────────┘
//! ```
//!
//! ## Tick Flow
//!
//! 1. Resolve own IP; on failure the tick ends
//! 2. Read the published record; on failure the tick ends
//! 3. Equal content: nothing to do
//! 4. Different content: one update call; failure is fatal
//!
//! Ticks never overlap. A tick that ends early is retried after the same
//! fixed interval; there is no backoff.

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, IpSource};
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Scheduler started
    Started {
        interval_secs: u64,
    },

    /// Reconcile tick started
    TickStarted {
        tick: u64,
    },

    /// Published record already matches the observed address
    Converged {
        ip: Ipv4Addr,
    },

    /// Record updated to the observed address
    UpdateSucceeded {
        record_name: String,
        previous: String,
        new_ip: Ipv4Addr,
    },

    /// Tick ended early, no write attempted
    TickAborted {
        stage: TickStage,
        error: String,
    },

    /// Record update failed (fatal)
    UpdateFailed {
        record_name: String,
        error: String,
    },

    /// Scheduler stopped
    Stopped {
        reason: String,
    },
}

/// The step of a tick that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    /// Resolving the caller's own IP
    Resolve,
    /// Reading the published record
    Read,
}

/// Result of one reconcile tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do, the published record already holds `ip`
    Converged { ip: Ipv4Addr },

    /// The record was moved from `previous` to `new_ip`
    Updated { previous: String, new_ip: Ipv4Addr },

    /// The tick ended early at `stage`; no write was attempted
    Aborted { stage: TickStage, reason: String },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Run a single tick with [`DdnsEngine::run_once()`], or loop with
///    [`DdnsEngine::run()`]
/// 3. The loop ends on Ctrl-C or on a failed update
///
/// ## Threading
///
/// All work happens on the calling task, one tick at a time.
pub struct DdnsEngine {
    /// IP source for the observed address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for the published record
    provider: Box<dyn DnsProvider>,

    /// Sleep between ticks
    interval: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events.
    /// Dropping the receiver is fine; events are then discarded.
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            ip_source,
            provider,
            interval: Duration::from_secs(config.engine.interval_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one observe-compare-converge tick
    ///
    /// # Returns
    ///
    /// - `Ok(TickOutcome)`: The tick finished, possibly early
    /// - `Err(Error)`: The update call failed; callers must stop
    pub async fn reconcile(&self) -> Result<TickOutcome> {
        debug!("get own ip -");
        let observed = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!("get own ip err, {}", e);
                return Ok(self.abort(TickStage::Resolve, e.to_string()));
            }
        };
        debug!("get own ip: {}", observed);

        debug!("get domain ip -");
        let published = match self.provider.get_record().await {
            Ok(record) => record,
            Err(e) => {
                error!("get domain ip err, {}", e);
                return Ok(self.abort(TickStage::Read, e.to_string()));
            }
        };
        debug!("get domain ip: {}", published.content);

        if published.matches(observed) {
            info!("same ip, ignore");
            self.emit_event(EngineEvent::Converged { ip: observed });
            return Ok(TickOutcome::Converged { ip: observed });
        }

        info!(
            "Updating {} record {}: {} -> {}",
            self.provider.provider_name(),
            published.name,
            published.content,
            observed
        );

        if let Err(e) = self.provider.update_record(&published, observed).await {
            error!("Failed to update record {}: {}", published.name, e);
            self.emit_event(EngineEvent::UpdateFailed {
                record_name: published.name.clone(),
                error: e.to_string(),
            });
            return Err(e);
        }

        debug!("update ok");
        self.emit_event(EngineEvent::UpdateSucceeded {
            record_name: published.name.clone(),
            previous: published.content.clone(),
            new_ip: observed,
        });

        Ok(TickOutcome::Updated {
            previous: published.content,
            new_ip: observed,
        })
    }

    /// Run a single tick and return its outcome
    pub async fn run_once(&self) -> Result<TickOutcome> {
        self.emit_event(EngineEvent::TickStarted { tick: 1 });
        let outcome = self.reconcile().await;

        self.emit_event(EngineEvent::Stopped {
            reason: "Single run completed".to_string(),
        });
        outcome
    }

    /// Run the engine
    ///
    /// Ticks immediately, then every `interval` until Ctrl-C.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: A record update failed
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the engine with a controlled shutdown signal
    ///
    /// Production code should use `run()`, which stops on SIGINT instead.
    /// The signal is only observed between ticks.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        mut shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!("Starting reconcile loop (interval={:?})", self.interval);
        self.emit_event(EngineEvent::Started {
            interval_secs: self.interval.as_secs(),
        });

        // Installed once so a SIGINT arriving mid-tick is not lost
        let mut interrupt = if shutdown_rx.is_some() {
            None
        } else {
            Some(InterruptListener::install()?)
        };

        let mut tick: u64 = 0;

        loop {
            tick += 1;
            self.emit_event(EngineEvent::TickStarted { tick });

            if let Err(e) = self.reconcile().await {
                self.emit_event(EngineEvent::Stopped {
                    reason: e.to_string(),
                });
                return Err(e);
            }

            let stop = match (shutdown_rx.as_mut(), interrupt.as_mut()) {
                (Some(rx), _) => tokio::select! {
                    _ = tokio::time::sleep(self.interval) => false,
                    _ = rx => true,
                },
                (None, Some(listener)) => tokio::select! {
                    _ = tokio::time::sleep(self.interval) => false,
                    _ = listener.recv() => true,
                },
                (None, None) => {
                    tokio::time::sleep(self.interval).await;
                    false
                }
            };

            if stop {
                info!("Shutdown signal received");
                self.emit_event(EngineEvent::Stopped {
                    reason: "Shutdown signal".to_string(),
                });
                break;
            }
        }

        Ok(())
    }

    fn abort(&self, stage: TickStage, reason: String) -> TickOutcome {
        self.emit_event(EngineEvent::TickAborted {
            stage,
            error: reason.clone(),
        });
        TickOutcome::Aborted { stage, reason }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// SIGINT listener that lives for the whole scheduler loop
struct InterruptListener {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
}

impl InterruptListener {
    fn install() -> Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let signal = signal(SignalKind::interrupt())
                .map_err(|e| Error::config(format!("Failed to set up SIGINT handler: {}", e)))?;
            Ok(Self { signal })
        }

        #[cfg(not(unix))]
        Ok(Self {})
    }

    async fn recv(&mut self) {
        #[cfg(unix)]
        self.signal.recv().await;

        #[cfg(not(unix))]
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_event_equality() {
        let event = EngineEvent::TickAborted {
            stage: TickStage::Resolve,
            error: "timed out".to_string(),
        };

        assert_eq!(event.clone(), event);
        assert_ne!(
            event,
            EngineEvent::TickAborted {
                stage: TickStage::Read,
                error: "timed out".to_string(),
            }
        );
    }
}
