//! Metrics and observability utilities
//!
//! Records engine activity through the `metrics` facade. The embedding
//! application decides which exporter (if any) receives them.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use std::time::Instant;

/// Metrics prefix for all PaperClub metrics
pub const METRICS_PREFIX: &str = "paperclub";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of feed, recommendation and statistics queries"
    );

    describe_histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Query latency in seconds"
    );

    describe_gauge!(
        format!("{}_query_rows", METRICS_PREFIX),
        Unit::Count,
        "Number of rows returned by the last query of each view"
    );

    describe_counter!(
        format!("{}_social_actions_total", METRICS_PREFIX),
        Unit::Count,
        "Like and unlike attempts by outcome"
    );

    describe_counter!(
        format!("{}_papers_created_total", METRICS_PREFIX),
        Unit::Count,
        "Total papers posted"
    );

    describe_counter!(
        format!("{}_tags_attached_total", METRICS_PREFIX),
        Unit::Count,
        "Total tag associations created"
    );

    describe_counter!(
        format!("{}_registrations_total", METRICS_PREFIX),
        Unit::Count,
        "Total users registered"
    );

    tracing::info!("Metrics registered");
}

/// Times one read query and records it on completion
pub struct QueryTimer {
    start: Instant,
    view: &'static str,
}

impl QueryTimer {
    /// Start timing a query for the named view
    pub fn start(view: &'static str) -> Self {
        Self {
            start: Instant::now(),
            view,
        }
    }

    /// Record completion with the number of rows returned
    pub fn finish(self, rows: usize) {
        record_query(self.view, self.start.elapsed().as_secs_f64(), rows);
    }
}

/// Helper to record query metrics
pub fn record_query(view: &str, duration_secs: f64, rows: usize) {
    counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        "view" => view.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        "view" => view.to_string()
    )
    .record(duration_secs);

    gauge!(
        format!("{}_query_rows", METRICS_PREFIX),
        "view" => view.to_string()
    )
    .set(rows as f64);
}

/// Helper to record a like/unlike attempt
pub fn record_social(action: &str, outcome: &str) {
    counter!(
        format!("{}_social_actions_total", METRICS_PREFIX),
        "action" => action.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Helper to record a newly posted paper
pub fn record_paper_created(tag_count: usize) {
    counter!(format!("{}_papers_created_total", METRICS_PREFIX)).increment(1);
    counter!(format!("{}_tags_attached_total", METRICS_PREFIX)).increment(tag_count as u64);
}

/// Helper to record a registration
pub fn record_registration() {
    counter!(format!("{}_registrations_total", METRICS_PREFIX)).increment(1);
}
