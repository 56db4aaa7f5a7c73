//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal's alternate screen, so diagnostics
//! go to a file rather than stderr. Without `--debug-log` no subscriber is
//! installed and tracing events are dropped.

use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs a file-backed tracing subscriber. The filter honors
/// `RUST_LOG` and defaults to `info` for this crate.
pub fn init_debug_log(path: &str) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gemchat=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
