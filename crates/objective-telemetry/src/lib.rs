//! # Objective Telemetry
//!
//! Observability for the Werewolf objective registry.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with env filter and either a
//!   pretty or a JSON formatter
//! - **Metrics**: Prometheus counters for registry, disclosure and store events
//!
//! ## Usage
//!
//! ```rust,ignore
//! use objective_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `werewolf-objectives` | Service name in logs |
//! | `OBJ_LOG_LEVEL` | `info` | Log level filter |
//! | `OBJ_JSON_LOGS` | `false` | JSON formatted output |
//! | `OBJ_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `OBJ_NETWORK` | `testnet` | Network label |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, DISCLOSURES, OBJECTIVES_CREATED,
    OBJECTIVE_TRANSITIONS, RECORDS_SKIPPED, STORE_FAILURES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    /// Metric registration failed (usually: already registered).
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration could not be turned into a filter.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    init_logging(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics_handle,
    })
}

/// Install a debug-level subscriber for tests, ignoring repeat calls.
pub fn init_test_logging() {
    let _ = init_logging(&TelemetryConfig::for_tests());
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
