//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

/// Initializes the tracing subscriber based on enabled features.
///
/// Logs go to stderr so stdout carries only the compiled prompt.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing() -> anyhow::Result<()> {
    #[cfg(feature = "json-logs")]
    {
        tracing::init_json_tracing().context("Failed to initialize JSON tracing")
    }

    #[cfg(not(feature = "json-logs"))]
    {
        tracing::init_tracing().context("Failed to initialize tracing")
    }
}
