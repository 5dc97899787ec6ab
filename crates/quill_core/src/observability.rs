//! Tracing subscriber initialization.

use quill_error::{ConfigError, QuillResult};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Log line format for the global subscriber.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, falling back to `default_directive`
/// (e.g. `"info"`) when the variable is unset or invalid.
///
/// # Errors
///
/// Returns a `ConfigError` if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_directive: &str) -> QuillResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;
    debug!(%format, "Tracing initialized");
    Ok(())
}
