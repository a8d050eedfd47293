//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install a JSON `tracing` subscriber filtered by `service.log_level`
///
/// Events go to stderr so they never mix with command output on stdout. An
/// unparsable level falls back to `info`. If a global subscriber is already
/// installed this does nothing, so it is safe to call more than once.
pub fn init_tracing(config: &Config) {
    let log_level = config.service.log_level.as_str();

    let installed = tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Tracing initialized for service: {}", config.service.name);
    }
}
