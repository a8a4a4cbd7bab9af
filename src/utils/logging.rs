//! Tracing subscriber setup

use anyhow::{anyhow, Result};
use indicatif::MultiProgress;
use std::io::Write;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise `debug` when verbose and `info`
/// when not. Log lines go to stderr through the progress display so they do
/// not tear the clone bars.
pub fn init_logging(verbose: bool, multi_progress: MultiProgress) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid log filter: {e}"))?;

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(move || ProgressWriter {
            multi_progress: multi_progress.clone(),
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

/// Writes to stderr while the progress bars are suspended
struct ProgressWriter {
    multi_progress: MultiProgress,
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.multi_progress.suspend(|| std::io::stderr().write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}
