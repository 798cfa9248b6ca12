//! Metrics and observability utilities
//!
//! Provides Prometheus metric descriptions and recording helpers
//! with standardized naming conventions.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram,
    gauge, histogram, Unit,
};
use std::time::Instant;

/// Metrics prefix for all LitGraph metrics
pub const METRICS_PREFIX: &str = "litgraph";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
];

/// Buckets for provider queries and full update cycles (slow, sequential)
pub const UPSTREAM_BUCKETS: &[f64] = &[
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.000,  // 2s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
    60.00,  // 1m
    120.0,  // 2m
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Provider metrics
    describe_counter!(
        format!("{}_provider_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total provider queries by outcome"
    );

    describe_histogram!(
        format!("{}_provider_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Provider query latency in seconds"
    );

    // Normalization metrics
    describe_counter!(
        format!("{}_articles_normalized_total", METRICS_PREFIX),
        Unit::Count,
        "Raw provider items normalized into articles"
    );

    describe_counter!(
        format!("{}_articles_skipped_total", METRICS_PREFIX),
        Unit::Count,
        "Raw provider items skipped during normalization"
    );

    // Update metrics
    describe_counter!(
        format!("{}_articles_added_total", METRICS_PREFIX),
        Unit::Count,
        "Articles appended to the corpus by update cycles"
    );

    describe_histogram!(
        format!("{}_update_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Full update cycle latency in seconds"
    );

    // Graph metrics
    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Relationship graph build latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Number of article nodes in the current snapshot"
    );

    describe_gauge!(
        format!("{}_graph_links", METRICS_PREFIX),
        Unit::Count,
        "Number of relationship links in the current snapshot"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record one provider query
pub fn record_provider_query(provider: &str, outcome: &str, duration_secs: f64) {
    counter!(
        format!("{}_provider_queries_total", METRICS_PREFIX),
        "provider" => provider.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_provider_query_duration_seconds", METRICS_PREFIX),
        "provider" => provider.to_string()
    )
    .record(duration_secs);
}

/// Helper to record normalization outcomes for one query
pub fn record_normalization(provider: &str, normalized: usize, skipped: usize) {
    counter!(
        format!("{}_articles_normalized_total", METRICS_PREFIX),
        "provider" => provider.to_string()
    )
    .increment(normalized as u64);

    if skipped > 0 {
        counter!(
            format!("{}_articles_skipped_total", METRICS_PREFIX),
            "provider" => provider.to_string()
        )
        .increment(skipped as u64);
    }
}

/// Helper to record a finished update cycle
pub fn record_update(duration_secs: f64, added: usize) {
    counter!(format!("{}_articles_added_total", METRICS_PREFIX)).increment(added as u64);

    histogram!(format!("{}_update_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record a graph build
pub fn record_graph(duration_secs: f64, nodes: usize, links: usize) {
    histogram!(format!("{}_graph_build_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_links", METRICS_PREFIX)).set(links as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_sorted() {
        for buckets in [LATENCY_BUCKETS, UPSTREAM_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_recording_without_recorder() {
        // No global recorder installed: calls must be no-ops
        let metrics = RequestMetrics::start("GET", "/api/articles");
        metrics.finish(200);
        record_provider_query("ACS Publications", "ok", 0.2);
        record_normalization("ACS Publications", 3, 1);
        record_update(1.5, 4);
        record_graph(0.01, 10, 12);
    }
}
