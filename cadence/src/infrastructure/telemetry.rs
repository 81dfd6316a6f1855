//! Logging setup.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Builder for the logging subscriber.
///
/// Emits JSON-formatted events to stderr; the filter honors `RUST_LOG` and
/// falls back to the configured level.
pub struct TelemetryBuilder {
    service_name: String,
    log_level: String,
}

impl TelemetryBuilder {
    /// Creates a builder for the named service at `info` level.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
        }
    }

    /// Sets the fallback log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Initializes the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already set.
    pub fn init(self) -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let fmt_layer = fmt::layer().json().boxed();

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        info!(service = %self.service_name, "telemetry initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_level() {
        let builder = TelemetryBuilder::new("cadence").with_log_level("debug");
        assert_eq!(builder.log_level, "debug");
        assert_eq!(builder.service_name, "cadence");
    }
}
