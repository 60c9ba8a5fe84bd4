//! Prometheus metrics for the objective registry.
//!
//! All metrics follow the naming convention: `wo_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REGISTRY METRICS
    // =========================================================================

    /// Objectives successfully written and indexed
    pub static ref OBJECTIVES_CREATED: Counter = Counter::new(
        "wo_registry_objectives_created_total",
        "Total number of objectives written and indexed"
    ).expect("metric creation failed");

    /// Lifecycle transitions by target status and outcome
    pub static ref OBJECTIVE_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("wo_registry_transitions_total", "Lifecycle transitions attempted"),
        &["to", "outcome"]  // to: revealed/completed, outcome: applied/rejected
    ).expect("metric creation failed");

    /// Records skipped while listing because they were missing or malformed
    pub static ref RECORDS_SKIPPED: Counter = Counter::new(
        "wo_registry_records_skipped_total",
        "Index entries whose record was absent or unparseable"
    ).expect("metric creation failed");

    // =========================================================================
    // DISCLOSURE METRICS
    // =========================================================================

    /// Disclosure attempts by outcome
    pub static ref DISCLOSURES: CounterVec = CounterVec::new(
        Opts::new("wo_disclosure_attempts_total", "Disclosure attempts"),
        &["outcome"]  // granted/unauthorized/signature_rejected/malformed
    ).expect("metric creation failed");

    // =========================================================================
    // STORE METRICS
    // =========================================================================

    /// Remote store failures by kind
    pub static ref STORE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("wo_store_failures_total", "Remote store failures"),
        &["kind"]  // unavailable/rejected/transport
    ).expect("metric creation failed");
}

/// Handle for the registered metrics.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice fails; callers that may initialise more than once should
/// treat `TelemetryError::MetricsInit` as benign.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OBJECTIVES_CREATED.clone()),
        Box::new(OBJECTIVE_TRANSITIONS.clone()),
        Box::new(RECORDS_SKIPPED.clone()),
        Box::new(DISCLOSURES.clone()),
        Box::new(STORE_FAILURES.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all registered metrics in the Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
