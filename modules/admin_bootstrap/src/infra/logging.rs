//! Tracing subscriber setup

use crate::config::{LogFormat, LoggingConfig};
use crate::contract::BootstrapError;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Events go to stderr so command output on stdout stays clean. `RUST_LOG`
/// overrides the configured level. Installing twice is an error, not a panic.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), BootstrapError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cfg.level)
            .map_err(|e| BootstrapError::Logging(format!("bad level '{}': {e}", cfg.level)))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| BootstrapError::Logging(e.to_string()))
}
