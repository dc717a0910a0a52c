// # ddnsd - DDNS Daemon
//
// Thin integration layer: parses flags, sets up logging, registers the
// built-in providers and hands control to `ddns_core::DdnsEngine`.
// All reconcile logic lives in ddns-core.
//
// ## Example
//
// ```bash
// export DDNS_TOKEN=your_token
// ddnsd --zoneid 023e105f4ecef8ad9ca31a8372d0c353 --domain example.com
//
// ddnsd --provider godaddy --key KEY --secret SECRET \
//       --domain example.com --subdomain home --interval 600
// ```
//
// Backgrounding is left to the service manager; see dist/ddnsd.service.

mod cli;
mod logging;

use clap::Parser;
use cli::Args;
use ddns_core::{DdnsConfig, DdnsEngine, ProviderRegistry, TickOutcome};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

/// Exit codes for different termination scenarios
///
/// - 0: Clean shutdown
/// - 1: Configuration error or failed record update
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Missing configuration or a record update the provider refused
    Fatal = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_version {
        println!("{}", cli::version_string());
        return DdnsExitCode::CleanShutdown.into();
    }

    if let Err(e) = logging::init(&args.log_file, args.log_level) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::Fatal.into();
    }

    if args.daemon {
        warn!("--daemon is ignored; run ddnsd under a service manager to background it");
    }

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::Fatal.into();
        }
    };

    info!(
        "Starting ddnsd (provider={}, interval={}s)",
        config.provider.type_name(),
        config.engine.interval_secs
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config, args.once).await {
            error!("{}", e);
            DdnsExitCode::Fatal
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Register every provider compiled into this binary
fn build_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    ddns_ip_http::register(&mut registry);

    #[cfg(feature = "cloudflare")]
    ddns_provider_cloudflare::register(&mut registry);

    #[cfg(feature = "godaddy")]
    ddns_provider_godaddy::register(&mut registry);

    registry
}

/// Run the daemon
async fn run_daemon(config: DdnsConfig, once: bool) -> anyhow::Result<()> {
    let registry = build_registry();
    debug!("Registered providers: {:?}", registry.list_providers());

    let ip_source = registry.create_ip_source(&config.ip_source)?;
    let provider = registry.create_provider(&config.provider)?;

    let (engine, mut events) = DdnsEngine::new(ip_source, provider, config)?;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("Engine event: {:?}", event);
        }
    });

    if once {
        match engine.run_once().await? {
            TickOutcome::Aborted { reason, .. } => info!("Single run ended early: {}", reason),
            outcome => debug!("Single run finished: {:?}", outcome),
        }
    } else {
        engine.run().await?;
        info!("Shutting down daemon");
    }

    Ok(())
}
