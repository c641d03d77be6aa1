//! Metrics and observability utilities
//!
//! Prometheus metrics for the claim pipeline and the HTTP gateway,
//! with standardized naming conventions.

use crate::config::AnalyzerMode;
use crate::models::Verdict;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all WikiCheck metrics
pub const METRICS_PREFIX: &str = "wikicheck";

/// Histogram buckets for end-to-end claim latency (in seconds).
/// A claim fans out to several network round trips, so the range is wide.
pub const CLAIM_LATENCY_BUCKETS: &[f64] = &[
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
    60.00,  // 60s
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

    // Pipeline metrics
    describe_counter!(
        format!("{}_claims_checked_total", METRICS_PREFIX),
        Unit::Count,
        "Total claims run through the pipeline, by verdict"
    );

    describe_histogram!(
        format!("{}_claim_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "End-to-end claim latency in seconds"
    );

    describe_counter!(
        format!("{}_documents_total", METRICS_PREFIX),
        Unit::Count,
        "Documents considered, by outcome (used, skipped)"
    );

    describe_counter!(
        format!("{}_retrieval_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Retrieval failures by kind"
    );

    // Analyzer metrics
    describe_counter!(
        format!("{}_analyzer_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Semantic analyzer failures answered by the heuristic"
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

/// Record a completed claim
pub fn record_fact_check(duration_secs: f64, mode: AnalyzerMode, verdict: Verdict) {
    counter!(
        format!("{}_claims_checked_total", METRICS_PREFIX),
        "mode" => mode.as_str(),
        "verdict" => verdict.as_str()
    )
    .increment(1);

    histogram!(
        format!("{}_claim_duration_seconds", METRICS_PREFIX),
        "mode" => mode.as_str()
    )
    .record(duration_secs);
}

/// Record documents that contributed a body versus those skipped
pub fn record_documents(used: usize, skipped: usize) {
    counter!(format!("{}_documents_total", METRICS_PREFIX), "outcome" => "used")
        .increment(used as u64);
    counter!(format!("{}_documents_total", METRICS_PREFIX), "outcome" => "skipped")
        .increment(skipped as u64);
}

/// Record a retrieval failure (rate_limited, timeout, transient)
pub fn record_retrieval_error(kind: &'static str) {
    counter!(
        format!("{}_retrieval_errors_total", METRICS_PREFIX),
        "kind" => kind
    )
    .increment(1);
}

/// Record a semantic analyzer failure answered by the heuristic
pub fn record_analyzer_fallback(provider: &str) {
    counter!(
        format!("{}_analyzer_fallbacks_total", METRICS_PREFIX),
        "provider" => provider.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_latency_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in CLAIM_LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: every helper must be a no-op
        let metrics = RequestMetrics::start("POST", "/v1/fact-check");
        metrics.finish(200);
        record_fact_check(0.5, AnalyzerMode::Keyword, Verdict::True);
        record_documents(3, 2);
        record_retrieval_error("timeout");
        record_analyzer_fallback("openai");
    }
}
