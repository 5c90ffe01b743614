//! Records cache activity through the `metrics` facade.

use alloy_primitives::B256;
use lwd_compact::{CompactBlock, RlpCodec};
use lwd_window_cache::{AddOutcome, Metrics, MetricsObserver, WindowCache};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{num::NonZeroUsize, sync::Arc};

fn block(height: u64, branch: u8) -> CompactBlock {
    let hash = |height: u64| {
        let mut hash = B256::repeat_byte(branch);
        hash[24..].copy_from_slice(&height.to_be_bytes());
        hash
    };
    CompactBlock::new(height, hash(height), hash(height - 1))
}

#[test]
fn test_cache_activity_is_recorded() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        Metrics::init();
        let cache = WindowCache::new(NonZeroUsize::new(2).unwrap(), RlpCodec::new())
            .with_observer(Arc::new(MetricsObserver));

        for height in 1..=3 {
            assert_eq!(cache.add(height, &block(height, 0)).unwrap(), AddOutcome::Inserted);
        }
        assert_eq!(cache.add(3, &block(3, 1)).unwrap(), AddOutcome::ReorgDetected);
        assert!(cache.get(2).is_some());
        assert!(cache.get(1).is_none());
    });

    let rendered = handle.render();
    assert!(rendered.contains("lwd_window_cache_inserts_total 3"));
    assert!(rendered.contains("lwd_window_cache_evictions_total 1"));
    assert!(rendered.contains("lwd_window_cache_truncated_total 1"));
    assert!(rendered.contains("lwd_window_cache_reorgs_total 1"));
    assert!(rendered.contains("lwd_window_cache_hits_total 1"));
    assert!(rendered.contains("lwd_window_cache_misses_total 1"));
    assert!(rendered.contains("lwd_window_cache_latest_height 3"));
}
