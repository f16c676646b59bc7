//! Subscriber installation for the `tracing` facade.
//!
//! Events are formatted by `tracing_subscriber::fmt` and written to stderr so
//! that stdout stays reserved for the dump. `RUST_LOG`, when set, takes
//! precedence over the `-v` derived level.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

use super::config::VerbosityConfig;

/// Builds the event filter for `config`, honouring `RUST_LOG`.
pub fn build_filter(config: &VerbosityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()))
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(config.show_target)
        .without_time();

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(layer)
        .try_init()?;

    tracing::debug!(level = %config.level, "diagnostics enabled");
    Ok(())
}
