//! Logging setup: stdout plus an append-only log file

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Subscriber, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter, time::ChronoLocal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Open the log file, or return the warning to log when output falls back
/// to stdout only
pub fn open_or_fallback(path: &Path) -> Result<File, String> {
    open_log_file(path).map_err(|e| {
        format!(
            "Cannot open log file {}: {}; logging to stdout only",
            path.display(),
            e
        )
    })
}

fn timer() -> ChronoLocal {
    ChronoLocal::new(TIMESTAMP_FORMAT.to_string())
}

/// Level filter, a console layer writing to `stdout` and an optional file layer
fn subscriber<W>(
    level: LevelFilter,
    stdout: W,
    file: Option<File>,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_timer(timer())
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(level)
        .with(
            fmt::layer()
                .with_timer(timer())
                .with_target(false)
                .with_writer(stdout),
        )
        .with(file_layer)
}

/// Install the global subscriber
///
/// A log file that cannot be opened is not fatal: a warning is logged and
/// output goes to stdout only.
pub fn init(log_file: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let (file, fallback_warning) = match open_or_fallback(log_file) {
        Ok(file) => (Some(file), None),
        Err(warning) => (None, Some(warning)),
    };

    subscriber(level, io::stdout, file).try_init()?;

    if let Some(warning) = fallback_warning {
        warn!("{}", warning);
    }

    Ok(())
}
