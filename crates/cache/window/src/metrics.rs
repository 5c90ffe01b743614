//! Metrics for the window cache.

use crate::CacheObserver;

/// Container for the metrics recorded by [`MetricsObserver`].
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Number of blocks stored.
    pub const WINDOW_CACHE_INSERTS_TOTAL: &'static str = "lwd_window_cache_inserts_total";
    /// Number of heights evicted to stay within capacity.
    pub const WINDOW_CACHE_EVICTIONS_TOTAL: &'static str = "lwd_window_cache_evictions_total";
    /// Number of heights discarded by conflict truncation.
    pub const WINDOW_CACHE_TRUNCATED_TOTAL: &'static str = "lwd_window_cache_truncated_total";
    /// Number of reorgs detected on insert.
    pub const WINDOW_CACHE_REORGS_TOTAL: &'static str = "lwd_window_cache_reorgs_total";
    /// Number of blocks that failed to encode.
    pub const WINDOW_CACHE_ENCODE_FAILURES_TOTAL: &'static str =
        "lwd_window_cache_encode_failures_total";
    /// Number of cached payloads that failed to decode.
    pub const WINDOW_CACHE_DECODE_FAILURES_TOTAL: &'static str =
        "lwd_window_cache_decode_failures_total";
    /// Number of lookups served from the cache.
    pub const WINDOW_CACHE_HITS_TOTAL: &'static str = "lwd_window_cache_hits_total";
    /// Number of lookups not served from the cache.
    pub const WINDOW_CACHE_MISSES_TOTAL: &'static str = "lwd_window_cache_misses_total";
    /// Height of the most recently stored block.
    pub const WINDOW_CACHE_LATEST_HEIGHT: &'static str = "lwd_window_cache_latest_height";

    const COUNTERS: [(&'static str, &'static str); 8] = [
        (Self::WINDOW_CACHE_INSERTS_TOTAL, "Total number of blocks stored in the window cache"),
        (
            Self::WINDOW_CACHE_EVICTIONS_TOTAL,
            "Total number of heights evicted from the window cache to stay within capacity",
        ),
        (
            Self::WINDOW_CACHE_TRUNCATED_TOTAL,
            "Total number of heights discarded from the window cache tip before an insert",
        ),
        (Self::WINDOW_CACHE_REORGS_TOTAL, "Total number of reorgs detected by the window cache"),
        (
            Self::WINDOW_CACHE_ENCODE_FAILURES_TOTAL,
            "Total number of blocks the window cache failed to encode",
        ),
        (
            Self::WINDOW_CACHE_DECODE_FAILURES_TOTAL,
            "Total number of cached payloads the window cache failed to decode",
        ),
        (Self::WINDOW_CACHE_HITS_TOTAL, "Total number of lookups served by the window cache"),
        (Self::WINDOW_CACHE_MISSES_TOTAL, "Total number of lookups missed by the window cache"),
    ];

    /// Initializes metrics for the window cache.
    ///
    /// This does two things:
    /// * Describes the metrics.
    /// * Initializes the metrics with their default values.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        for (name, description) in Self::COUNTERS {
            metrics::describe_counter!(name, metrics::Unit::Count, description);
        }

        metrics::describe_gauge!(
            Self::WINDOW_CACHE_LATEST_HEIGHT,
            metrics::Unit::Count,
            "Height of the most recently stored block in the window cache",
        );
    }

    fn zero() {
        for (name, _) in Self::COUNTERS {
            metrics::counter!(name).increment(0);
        }

        metrics::gauge!(Self::WINDOW_CACHE_LATEST_HEIGHT).set(0.0);
    }
}

/// A [`CacheObserver`] recording cache activity through the `metrics` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl CacheObserver for MetricsObserver {
    fn on_insert(&self, height: u64) {
        metrics::counter!(Metrics::WINDOW_CACHE_INSERTS_TOTAL).increment(1);
        metrics::gauge!(Metrics::WINDOW_CACHE_LATEST_HEIGHT).set(height as f64);
    }

    fn on_evict(&self, _height: u64) {
        metrics::counter!(Metrics::WINDOW_CACHE_EVICTIONS_TOTAL).increment(1);
    }

    fn on_truncate(&self, _from: u64, count: usize) {
        metrics::counter!(Metrics::WINDOW_CACHE_TRUNCATED_TOTAL).increment(count as u64);
    }

    fn on_reorg(&self, _height: u64) {
        metrics::counter!(Metrics::WINDOW_CACHE_REORGS_TOTAL).increment(1);
    }

    fn on_encode_failure(&self, _height: u64, _err: &(dyn core::error::Error + 'static)) {
        metrics::counter!(Metrics::WINDOW_CACHE_ENCODE_FAILURES_TOTAL).increment(1);
    }

    fn on_decode_failure(&self, _height: u64, _err: &(dyn core::error::Error + 'static)) {
        metrics::counter!(Metrics::WINDOW_CACHE_DECODE_FAILURES_TOTAL).increment(1);
    }

    fn on_hit(&self, _height: u64) {
        metrics::counter!(Metrics::WINDOW_CACHE_HITS_TOTAL).increment(1);
    }

    fn on_miss(&self, _height: u64) {
        metrics::counter!(Metrics::WINDOW_CACHE_MISSES_TOTAL).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_init_zeroes_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, Metrics::init);

        let rendered = handle.render();
        assert!(rendered.contains("lwd_window_cache_reorgs_total 0"));
        assert!(rendered.contains("lwd_window_cache_latest_height 0"));
    }

    #[test]
    fn test_observer_records_activity() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let observer = MetricsObserver;
            observer.on_insert(41);
            observer.on_insert(42);
            observer.on_truncate(40, 3);
            observer.on_reorg(40);
            observer.on_miss(7);
        });

        let rendered = handle.render();
        assert!(rendered.contains("lwd_window_cache_inserts_total 2"));
        assert!(rendered.contains("lwd_window_cache_latest_height 42"));
        assert!(rendered.contains("lwd_window_cache_truncated_total 3"));
        assert!(rendered.contains("lwd_window_cache_reorgs_total 1"));
        assert!(rendered.contains("lwd_window_cache_misses_total 1"));
    }
}
