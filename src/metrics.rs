//! Prometheus metrics for store operations and HTTP requests.
//!
//! This module provides metrics for:
//! - Store operation latency and counts, labelled by resource and operation
//! - Store operation failures, labelled by error kind
//! - Collection size per resource
//! - HTTP request latency per matched route

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::StoreError;

// === Metric Name Constants ===

/// Store operation latency metric name.
pub const METRIC_STORE_OPERATION_LATENCY: &str = "store_operation_latency_ms";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Store operations counter metric name.
pub const METRIC_STORE_OPERATIONS: &str = "store_operations_total";
/// Failed store operations counter metric name.
pub const METRIC_STORE_ERRORS: &str = "store_errors_total";
/// Records currently held gauge metric name.
pub const METRIC_STORE_RECORDS: &str = "store_records";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_STORE_OPERATION_LATENCY,
        "Store operation latency in milliseconds"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(
        METRIC_STORE_OPERATIONS,
        "Total number of store operations attempted"
    );
    describe_counter!(
        METRIC_STORE_ERRORS,
        "Total number of store operations that failed"
    );

    describe_gauge!(METRIC_STORE_RECORDS, "Number of records currently stored");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> crate::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
}

/// Increment the store operation counter.
pub fn inc_store_operations(resource: &'static str, op: &'static str) {
    counter!(METRIC_STORE_OPERATIONS, "resource" => resource, "op" => op).increment(1);
}

/// Increment the failed store operation counter.
pub fn inc_store_errors(resource: &'static str, op: &'static str, err: &StoreError) {
    let kind = match err {
        StoreError::InvalidInput => "invalid_input",
        StoreError::Validation(_) => "validation",
        StoreError::NotFound { .. } => "not_found",
        StoreError::IdsExhausted { .. } => "ids_exhausted",
    };
    counter!(METRIC_STORE_ERRORS, "resource" => resource, "op" => op, "kind" => kind).increment(1);
}

/// Set the current collection size.
pub fn set_store_records(resource: &'static str, len: usize) {
    gauge!(METRIC_STORE_RECORDS, "resource" => resource).set(len as f64);
}

/// RAII guard for timing store operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    resource: &'static str,
    op: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for one store operation.
    pub fn new(resource: &'static str, op: &'static str) -> Self {
        Self {
            start: Instant::now(),
            resource,
            op,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(
            METRIC_STORE_OPERATION_LATENCY,
            "resource" => self.resource,
            "op" => self.op
        )
        .record(latency_ms);
    }
}

/// Count and time one store operation.
pub fn timer_store_op(resource: &'static str, op: &'static str) -> LatencyTimer {
    inc_store_operations(resource, op);
    LatencyTimer::new(resource, op)
}
