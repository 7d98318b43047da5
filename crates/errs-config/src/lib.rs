#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use env::ExpandError;
pub use loader::ConfigError;
pub use server::{DEFAULT_LISTEN_ADDRESS, HealthConfig, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level configuration for the reference service
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
