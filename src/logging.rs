//! Structured logging setup using `tracing-subscriber`.
//!
//! The tools only emit `tracing` events; installing a subscriber is the
//! embedding host's call. Two helpers cover the common cases:
//! - **Console** ([`init_cli`]): human-readable output on stderr
//! - **JSON** ([`init_json`]): one JSON object per event on stderr
//!
//! Both honour `RUST_LOG` (default: `info`) and return an error instead of
//! panicking when a global subscriber is already installed.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a human-readable stderr subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_cli() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install console subscriber: {e}"))
}

/// Install a JSON stderr subscriber for hosts that ship logs to a collector.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_json() -> anyhow::Result<()> {
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install JSON subscriber: {e}"))
}
