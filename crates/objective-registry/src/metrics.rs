//! # Registry Metrics
//!
//! Recording functions over the Prometheus counters defined in
//! `objective-telemetry`.
//!
//! ## Usage
//!
//! Enabled by the default `metrics` feature:
//! ```toml
//! objective-registry = { path = "...", default-features = false }  # no-op recording
//! ```

use crate::errors::StoreError;

#[cfg(feature = "metrics")]
use objective_telemetry::{
    DISCLOSURES, OBJECTIVES_CREATED, OBJECTIVE_TRANSITIONS, RECORDS_SKIPPED, STORE_FAILURES,
};

/// Label for a store failure.
#[must_use]
pub fn store_failure_kind(err: &StoreError) -> &'static str {
    match err {
        StoreError::Unavailable => "unavailable",
        StoreError::Rejected(_) => "rejected",
        StoreError::Transport(_) => "transport",
    }
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an objective written and indexed
#[cfg(feature = "metrics")]
pub fn record_objective_created() {
    OBJECTIVES_CREATED.inc();
}

/// Record a transition attempt (`outcome`: applied/rejected)
#[cfg(feature = "metrics")]
pub fn record_transition(to: &str, outcome: &str) {
    OBJECTIVE_TRANSITIONS.with_label_values(&[to, outcome]).inc();
}

/// Record index entries skipped during a listing
#[cfg(feature = "metrics")]
pub fn record_records_skipped(count: usize) {
    RECORDS_SKIPPED.inc_by(count as f64);
}

/// Record a disclosure attempt by outcome
#[cfg(feature = "metrics")]
pub fn record_disclosure(outcome: &str) {
    DISCLOSURES.with_label_values(&[outcome]).inc();
}

/// Record a failed store call
#[cfg(feature = "metrics")]
pub fn record_store_failure(err: &StoreError) {
    STORE_FAILURES
        .with_label_values(&[store_failure_kind(err)])
        .inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

/// Record an objective written and indexed (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_objective_created() {}

/// Record a transition attempt (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_transition(_to: &str, _outcome: &str) {}

/// Record index entries skipped during a listing (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_records_skipped(_count: usize) {}

/// Record a disclosure attempt (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_disclosure(_outcome: &str) {}

/// Record a failed store call (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_store_failure(_err: &StoreError) {}
