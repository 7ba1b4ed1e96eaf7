//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Tour executions started and finished, by outcome
//! - Key points completed, by trigger (proximity or manual)
//! - Purchase verifications by outcome
//! - Purchase RPC latency
//! - Tours gRPC server calls by method and outcome

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "tour_service";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Execution lifecycle events
pub static EXECUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("executions_total", "Tour executions by lifecycle event").namespace(NAMESPACE),
        &["event"], // "started", "completed", "abandoned"
    )
    .expect("Failed to create EXECUTIONS_TOTAL metric")
});

/// Key point completions
pub static KEY_POINTS_COMPLETED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("key_points_completed_total", "Key points recorded as completed")
            .namespace(NAMESPACE),
        &["trigger"], // "proximity", "manual"
    )
    .expect("Failed to create KEY_POINTS_COMPLETED_TOTAL metric")
});

/// Purchase verification outcomes
pub static PURCHASE_VERIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("purchase_verifications_total", "Purchase verifications by outcome")
            .namespace(NAMESPACE),
        &["outcome"], // "purchased", "not_purchased", "error"
    )
    .expect("Failed to create PURCHASE_VERIFICATIONS_TOTAL metric")
});

/// Purchase RPC latency
pub static PURCHASE_RPC_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "purchase_rpc_duration_seconds",
            "VerifyPurchase round-trip latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["result"], // "ok", "error"
    )
    .expect("Failed to create PURCHASE_RPC_DURATION_SECONDS metric")
});

/// Calls served by the tours gRPC server
pub static GRPC_SERVER_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("grpc_server_calls_total", "Tours gRPC calls by method and outcome")
            .namespace(NAMESPACE),
        &["method", "outcome"], // "ok", "rejected", "error"
    )
    .expect("Failed to create GRPC_SERVER_CALLS_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(EXECUTIONS_TOTAL.clone()))
        .expect("Failed to register EXECUTIONS_TOTAL");
    registry
        .register(Box::new(KEY_POINTS_COMPLETED_TOTAL.clone()))
        .expect("Failed to register KEY_POINTS_COMPLETED_TOTAL");
    registry
        .register(Box::new(PURCHASE_VERIFICATIONS_TOTAL.clone()))
        .expect("Failed to register PURCHASE_VERIFICATIONS_TOTAL");
    registry
        .register(Box::new(PURCHASE_RPC_DURATION_SECONDS.clone()))
        .expect("Failed to register PURCHASE_RPC_DURATION_SECONDS");
    registry
        .register(Box::new(GRPC_SERVER_CALLS_TOTAL.clone()))
        .expect("Failed to register GRPC_SERVER_CALLS_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record an execution lifecycle event
pub fn record_execution_event(event: &str) {
    EXECUTIONS_TOTAL.with_label_values(&[event]).inc();
}

/// Helper to record a key point completion
pub fn record_key_point_completed(trigger: &str) {
    KEY_POINTS_COMPLETED_TOTAL.with_label_values(&[trigger]).inc();
}

/// Helper to record a purchase verification outcome and latency
pub fn record_purchase_verification(outcome: &str, duration_secs: f64) {
    PURCHASE_VERIFICATIONS_TOTAL
        .with_label_values(&[outcome])
        .inc();
    let result = if outcome == "error" { "error" } else { "ok" };
    PURCHASE_RPC_DURATION_SECONDS
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// Helper to record a call served by the tours gRPC server
pub fn record_grpc_call(method: &str, outcome: &str) {
    GRPC_SERVER_CALLS_TOTAL.with_label_values(&[method, outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*EXECUTIONS_TOTAL;
        let _ = &*KEY_POINTS_COMPLETED_TOTAL;
        let _ = &*PURCHASE_VERIFICATIONS_TOTAL;
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("tour_service_http_requests_total"));
    }

    #[test]
    fn test_record_execution_events() {
        record_execution_event("started");
        record_key_point_completed("proximity");
        record_purchase_verification("purchased", 0.02);
        let metrics = gather_metrics();
        assert!(metrics.contains("tour_service_executions_total"));
        assert!(metrics.contains("tour_service_key_points_completed_total"));
        assert!(metrics.contains("tour_service_purchase_rpc_duration_seconds"));
    }

    #[test]
    fn test_record_grpc_call() {
        record_grpc_call("ReserveTours", "rejected");
        let metrics = gather_metrics();
        assert!(metrics.contains("tour_service_grpc_server_calls_total"));
    }
}
