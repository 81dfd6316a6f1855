//! Infrastructure components (config, telemetry).

/// Process configuration, loaded once from the environment.
pub mod config;
/// Logging setup.
pub mod telemetry;
