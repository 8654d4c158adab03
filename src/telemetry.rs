//! Tracing setup.
//!
//! Installs a `tracing-subscriber` with an environment filter. Log verbosity
//! is controlled via `RUST_LOG` (e.g. `RUST_LOG=flowrun=debug`).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Safe to call once at startup; subsequent calls are no-ops (the first
/// registered subscriber wins).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
