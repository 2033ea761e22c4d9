//! Logging setup for the CLI.
//!
//! Installs a global tracing subscriber writing to stderr, filtered by
//! `RUST_LOG` with an `info` default. User-facing results go through
//! `output`, never the logger.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
