//! Structured logging with JSON or pretty output.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// Logging is initialized; carries the service name.
    pub const STARTUP: &str = "startup";

    /// A route table was compiled.
    pub const TABLE_BUILT: &str = "table_built";

    /// The live route table was swapped for a new one.
    pub const TABLE_RELOADED: &str = "table_reloaded";

    /// A reload was rejected; the previous table stays live.
    pub const RELOAD_FAILED: &str = "reload_failed";

    /// A request resolved to an action.
    pub const ROUTE_SELECTED: &str = "route_selected";

    /// No template matched the request path.
    pub const ROUTE_NOT_FOUND: &str = "route_not_found";

    /// The path matched but no route accepts the method.
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";

    /// A manifest was read and parsed.
    pub const MANIFEST_LOADED: &str = "manifest_loaded";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_table_built {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::TABLE_BUILT,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_table_reloaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::TABLE_RELOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_reload_failed {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::RELOAD_FAILED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_selected {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ROUTE_SELECTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_not_found {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ROUTE_NOT_FOUND,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_method_not_allowed {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::METHOD_NOT_ALLOWED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_manifest_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::MANIFEST_LOADED,
            $($field)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be installed once per process, so only
    // the configuration side is covered here.

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("invalid"), None);
    }

    #[test]
    fn macros_expand_with_fields() {
        // No subscriber installed: the events are simply dropped.
        crate::log_table_built!(routes = 3usize, "route table built");
        crate::log_route_not_found!(method = "GET", path = "/missing", "no route");
        crate::log_manifest_loaded!(path = "routes.yaml", controllers = 1usize, "manifest loaded");
    }
}
