//! Drives the cache the way an ingestion loop and request handlers share it.

use alloy_primitives::B256;
use lwd_compact::{CompactBlock, CompactTx, RlpCodec};
use lwd_window_cache::{AddOutcome, WindowCache, WindowCacheConfig};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

/// An upstream chain whose blocks above a fork point can be replaced.
#[derive(Debug, Default)]
struct Upstream {
    blocks: BTreeMap<u64, CompactBlock>,
}

impl Upstream {
    fn hash(height: u64, branch: u8) -> B256 {
        let mut hash = B256::repeat_byte(branch);
        hash[24..].copy_from_slice(&height.to_be_bytes());
        hash
    }

    fn extend(&mut self, to: u64, branch: u8) {
        let from = self.blocks.keys().next_back().map_or(0, |h| h + 1);
        for height in from..=to {
            let prev_hash =
                self.blocks.get(&height.wrapping_sub(1)).map_or(B256::ZERO, |b| b.hash);
            let tx = CompactTx { index: 0, hash: Self::hash(height, 0xee), ..Default::default() };
            let block = CompactBlock {
                vtx: vec![tx],
                ..CompactBlock::new(height, Self::hash(height, branch), prev_hash)
            };
            self.blocks.insert(height, block);
        }
    }

    /// Replaces every block from `height` up with blocks on `branch`.
    fn fork(&mut self, height: u64, branch: u8) {
        let tip = self.tip();
        self.blocks.retain(|h, _| *h < height);
        self.extend(tip, branch);
    }

    fn tip(&self) -> u64 {
        self.blocks.keys().next_back().copied().unwrap_or_default()
    }
}

type Cache = WindowCache<RlpCodec<CompactBlock>>;

/// Ingests up to the upstream tip, stepping back one height per detected reorg.
fn ingest(cache: &Cache, upstream: &Upstream) -> usize {
    let mut reorgs = 0;
    let mut height = cache.latest_height().map_or(0, |h| h + 1);
    while height <= upstream.tip() {
        match cache.add(height, &upstream.blocks[&height]).unwrap() {
            AddOutcome::Inserted => height += 1,
            AddOutcome::ReorgDetected => {
                reorgs += 1;
                height -= 1;
            }
        }
    }
    reorgs
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_ingest_recovers_from_reorg() {
    init_tracing();
    let cache = Cache::from_config(&WindowCacheConfig::new(50), RlpCodec::new()).unwrap();
    let mut upstream = Upstream::default();

    upstream.extend(120, 0);
    assert_eq!(ingest(&cache, &upstream), 0);
    assert_eq!(cache.window(), Some(71..=120));

    // Replace the last five blocks and grow the chain.
    upstream.fork(116, 1);
    upstream.extend(125, 1);

    // The stale tip is only noticed once a new block fails to link to it.
    assert_eq!(ingest(&cache, &upstream), 5);
    assert_eq!(cache.latest_height(), Some(125));
    assert_eq!(cache.window(), Some(76..=125));
    for height in 76..=125 {
        assert_eq!(cache.get(height).as_ref(), upstream.blocks.get(&height));
    }
}

#[test]
fn test_readers_during_ingestion() {
    init_tracing();
    let cache =
        Arc::new(Cache::from_config(&WindowCacheConfig::new(32), RlpCodec::new()).unwrap());
    let mut upstream = Upstream::default();
    upstream.extend(1_000, 0);
    let upstream = Arc::new(upstream);
    let done = Arc::new(AtomicBool::new(false));

    let readers = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let upstream = Arc::clone(&upstream);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut served = 0usize;
                while !done.load(Ordering::Acquire) {
                    let Some(latest) = cache.latest_height() else { continue };
                    if let Some(block) = cache.get(latest) {
                        assert_eq!(&block, &upstream.blocks[&latest]);
                        served += 1;
                    }
                }
                served
            })
        })
        .collect::<Vec<_>>();

    assert_eq!(ingest(&cache, &upstream), 0);
    done.store(true, Ordering::Release);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(cache.window(), Some(969..=1_000));
    assert_eq!(cache.len(), 32);
}
