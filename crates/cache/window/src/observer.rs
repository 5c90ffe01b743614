//! Observability hook for the cache.

use std::fmt::Debug;

/// Receives notifications about cache activity.
///
/// Every method has an empty default so implementors only override what they record.
/// Hooks run while the cache lock is held and must not call back into the cache.
pub trait CacheObserver: Debug + Send + Sync {
    /// A block was stored at `height`.
    fn on_insert(&self, _height: u64) {}

    /// The oldest cached height was dropped to stay within capacity.
    fn on_evict(&self, _height: u64) {}

    /// `count` cached heights starting at `from` were discarded before an insert.
    fn on_truncate(&self, _from: u64, _count: usize) {}

    /// A block at `height` did not link to the cached block below it.
    fn on_reorg(&self, _height: u64) {}

    /// The block at `height` could not be encoded.
    fn on_encode_failure(&self, _height: u64, _err: &(dyn core::error::Error + 'static)) {}

    /// The payload cached at `height` could not be decoded.
    fn on_decode_failure(&self, _height: u64, _err: &(dyn core::error::Error + 'static)) {}

    /// A lookup at `height` was served from the cache.
    fn on_hit(&self, _height: u64) {}

    /// A lookup at `height` was not served from the cache.
    fn on_miss(&self, _height: u64) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CacheObserver for NoopObserver {}
