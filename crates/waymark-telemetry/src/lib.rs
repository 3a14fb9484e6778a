//! Logging infrastructure for the Waymark routing engine.
//!
//! This crate provides:
//! - Structured JSON (or pretty) logging through `tracing-subscriber`
//! - Standard event names and `log_*!` macros stamping them
//!
//! # Usage
//!
//! ```ignore
//! use waymark_telemetry::{Telemetry, TelemetryConfig};
//!
//! let telemetry = Telemetry::init(TelemetryConfig::from_env())?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
pub use logging::events;

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Main telemetry handle.
pub struct Telemetry {
    config: TelemetryConfig,
}

impl Telemetry {
    /// Install the global log subscriber for `config`.
    ///
    /// Fails if a subscriber is already installed.
    pub fn init(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        logging::init_logging(&config)?;
        crate::log_startup!(
            service = %config.service_name,
            log_level = %config.log_level,
            log_format = ?config.log_format,
            "logging initialized"
        );
        Ok(Self { config })
    }

    /// Wrap `config` without touching the global subscriber.
    ///
    /// Use this when logging is already initialized (e.g., in tests).
    pub fn init_without_logging(config: TelemetryConfig) -> Self {
        Self { config }
    }

    /// Get the telemetry configuration.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}
