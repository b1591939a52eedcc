//! tracing-subscriber setup.
//!
//! `RUST_LOG` always wins over the built-in filter.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("thatsit={default_level},thatsit_core={default_level}"))
    })
}

/// Scripted commands keep stderr quiet unless asked.
pub fn init_stderr(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(if verbose { "debug" } else { "warn" }))
        .with_writer(std::io::stderr)
        .init();
}

/// The interactive session owns the terminal, so logs go to a file.
pub fn init_file(verbose: bool, path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter(if verbose { "debug" } else { "info" }))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
