//! Global tracing subscriber.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::FmtSubscriber;

/// Install the fmt subscriber once per process.
///
/// Log lines go to stderr so that stdout carries only the plan, or are
/// appended to `file` when one is configured.
pub fn init(level: tracing::Level, file: Option<&Path>) -> Result<()> {
    let builder = FmtSubscriber::builder().with_max_level(level);
    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let subscriber = builder.with_ansi(false).with_writer(Mutex::new(file)).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("setting default subscriber failed")?;
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("setting default subscriber failed")?;
        }
    }
    Ok(())
}
