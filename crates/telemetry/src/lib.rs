//! Logging and tracing bootstrap for the bookstore service.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the global tracing subscriber. `RUST_LOG` controls the
/// filter; the output format follows `telemetry.log_format`.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.map_err(|error| anyhow!("failed to set global tracing subscriber: {error}"))?;

    tracing::info!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}
