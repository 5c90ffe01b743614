//! The sliding window block cache.

use crate::{CacheObserver, NoopObserver, WindowCacheConfig, WindowCacheError};
use alloy_primitives::Bytes;
use derive_more::Display;
use lwd_compact::{BlockCodec, BlockRecord};
use parking_lot::RwLock;
use std::{collections::VecDeque, fmt, num::NonZeroUsize, ops::RangeInclusive, sync::Arc};
use tracing::{debug, info, trace, warn};

/// The result of a successful [`WindowCache::add`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The block was stored and is now the tip of the window.
    #[display("inserted")]
    Inserted,
    /// The block does not build on the cached block below it and was not stored.
    ///
    /// Heights at and above the rejected one have already been dropped from the window.
    /// The ingestor must re-drive ingestion from an earlier, still-consistent height.
    #[display("reorg detected")]
    ReorgDetected,
}

impl AddOutcome {
    /// Returns `true` if the add reported a reorg.
    pub const fn is_reorg(&self) -> bool {
        matches!(self, Self::ReorgDetected)
    }
}

/// A cached block: its encoded payload and its own hash.
#[derive(Debug, Clone)]
struct Entry {
    payload: Bytes,
    hash: Bytes,
}

/// The guarded state. `entries[i]` holds height `first + i`, so the held heights are
/// contiguous by construction.
#[derive(Debug, Default)]
struct Window {
    first: u64,
    entries: VecDeque<Entry>,
}

impl Window {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn last(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.first + (self.entries.len() as u64 - 1))
    }

    fn bounds(&self) -> Option<RangeInclusive<u64>> {
        self.last().map(|last| self.first..=last)
    }

    fn get(&self, height: u64) -> Option<&Entry> {
        let offset = usize::try_from(height.checked_sub(self.first)?).ok()?;
        self.entries.get(offset)
    }

    #[cfg(any(test, feature = "test-utils"))]
    fn get_mut(&mut self, height: u64) -> Option<&mut Entry> {
        let offset = usize::try_from(height.checked_sub(self.first)?).ok()?;
        self.entries.get_mut(offset)
    }

    /// Drops every held height at or above `height`, returning how many were dropped.
    fn truncate_from(&mut self, height: u64) -> usize {
        let before = self.entries.len();
        match height.checked_sub(self.first).map(usize::try_from) {
            Some(Ok(keep)) => self.entries.truncate(keep),
            Some(Err(_)) => {}
            None => self.entries.clear(),
        }
        before - self.entries.len()
    }

    /// Drops the whole window, returning how many heights were held.
    fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Appends an entry at `height`, which must extend the window or start an empty one.
    fn push(&mut self, height: u64, entry: Entry) {
        if self.is_empty() {
            self.first = height;
        }
        debug_assert_eq!(self.first + self.entries.len() as u64, height);
        self.entries.push_back(entry);
    }

    /// Drops the oldest height, returning it.
    fn pop_oldest(&mut self) -> Option<u64> {
        self.entries.pop_front()?;
        let height = self.first;
        self.first += 1;
        Some(height)
    }
}

/// A bounded cache holding a contiguous window of the most recently added blocks.
///
/// The cache is an explicitly owned instance: construct it once per ingestion session and
/// share it behind an [`Arc`] between the ingestion task and request handlers.
///
/// A single readers-writer lock guards the window. [`WindowCache::add`] holds it
/// exclusively for the whole insert, so readers never observe a block without its bounds
/// or bounds without their block. The lock does not order writers: `add` is expected to
/// be driven by one ingestion task.
pub struct WindowCache<C> {
    max_entries: NonZeroUsize,
    codec: C,
    observer: Arc<dyn CacheObserver>,
    window: RwLock<Window>,
}

impl<C: fmt::Debug> fmt::Debug for WindowCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowCache")
            .field("max_entries", &self.max_entries)
            .field("codec", &self.codec)
            .field("observer", &self.observer)
            .field("window", &self.window.read().bounds())
            .finish()
    }
}

impl<C> WindowCache<C>
where
    C: BlockCodec,
{
    /// Creates an empty cache holding at most `max_entries` blocks.
    pub fn new(max_entries: NonZeroUsize, codec: C) -> Self {
        debug!(
            target: "window_cache",
            max_entries = max_entries.get(),
            "Created block window cache"
        );
        Self {
            max_entries,
            codec,
            observer: Arc::new(NoopObserver),
            window: RwLock::new(Window::default()),
        }
    }

    /// Creates an empty cache from a validated [`WindowCacheConfig`].
    pub fn from_config(config: &WindowCacheConfig, codec: C) -> Result<Self, WindowCacheError> {
        Ok(Self::new(config.validate()?, codec))
    }

    /// Replaces the observer notified of cache activity.
    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Returns the capacity of the cache.
    pub const fn max_entries(&self) -> NonZeroUsize {
        self.max_entries
    }

    /// Returns the codec used to encode and decode payloads.
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Adds `block` at `height`.
    ///
    /// Any cached heights at or above `height` are discarded first. If the block then does
    /// not link to the cached block at `height - 1`, nothing is stored and
    /// [`AddOutcome::ReorgDetected`] is returned. The discarded heights are not restored in
    /// that case, nor when encoding fails.
    ///
    /// Adding above a gap (`height > latest + 1`) starts a fresh window at `height`, since
    /// the held heights can no longer be contiguous with it.
    ///
    /// Once stored, the oldest heights are evicted until the window fits the capacity.
    ///
    /// The window always reflects what is held. After a reorg or an encode failure at
    /// `height`, [`WindowCache::latest_height`] reports `height - 1` (or `None` if nothing
    /// below `height` was cached), not the previous tip.
    pub fn add(&self, height: u64, block: &C::Block) -> Result<AddOutcome, WindowCacheError> {
        let mut window = self.window.write();

        let from = height.max(window.first);
        let truncated = window.truncate_from(height);
        if truncated > 0 {
            debug!(target: "window_cache", from, truncated, "Truncated cached tip");
            self.observer.on_truncate(from, truncated);
        }

        if let Some(parent) = height.checked_sub(1).and_then(|h| window.get(h))
            && parent.hash.as_ref() != block.prev_hash()
        {
            info!(
                target: "window_cache",
                height,
                cached_parent = %parent.hash,
                prev_hash = %Bytes::copy_from_slice(block.prev_hash()),
                "Reorg detected"
            );
            self.observer.on_reorg(height);
            return Ok(AddOutcome::ReorgDetected);
        }

        let payload = match self.codec.encode(block) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(target: "window_cache", height, %err, "Failed to encode block");
                self.observer.on_encode_failure(height, &err);
                return Err(WindowCacheError::Encode { height, source: Box::new(err) });
            }
        };

        if let Some(last) = window.last()
            && height > last.saturating_add(1)
        {
            let first = window.first;
            let dropped = window.clear();
            warn!(
                target: "window_cache",
                height,
                last,
                dropped,
                "Non-contiguous add, restarting window"
            );
            (first..=last).for_each(|h| self.observer.on_evict(h));
        }

        window.push(height, Entry { payload, hash: Bytes::copy_from_slice(block.hash()) });
        trace!(target: "window_cache", height, "Stored block");
        self.observer.on_insert(height);

        while window.entries.len() > self.max_entries.get() {
            if let Some(evicted) = window.pop_oldest() {
                trace!(target: "window_cache", height = evicted, "Evicted block");
                self.observer.on_evict(evicted);
            }
        }

        Ok(AddOutcome::Inserted)
    }

    /// Returns the block cached at `height`.
    ///
    /// Heights outside the window are a miss. So is a payload that fails to decode: the
    /// failure is logged and reported to the observer, never returned.
    pub fn get(&self, height: u64) -> Option<C::Block> {
        let window = self.window.read();

        let Some(entry) = window.get(height) else {
            self.observer.on_miss(height);
            return None;
        };

        match self.codec.decode(&entry.payload) {
            Ok(block) => {
                self.observer.on_hit(height);
                Some(block)
            }
            Err(err) => {
                warn!(target: "window_cache", height, %err, "Failed to decode cached block");
                self.observer.on_decode_failure(height, &err);
                self.observer.on_miss(height);
                None
            }
        }
    }

    /// Returns the highest cached height, or `None` if the cache is empty.
    pub fn latest_height(&self) -> Option<u64> {
        self.window.read().last()
    }

    /// Returns the lowest cached height, or `None` if the cache is empty.
    pub fn first_height(&self) -> Option<u64> {
        let window = self.window.read();
        (!window.is_empty()).then_some(window.first)
    }

    /// Returns the range of cached heights, or `None` if the cache is empty.
    pub fn window(&self) -> Option<RangeInclusive<u64>> {
        self.window.read().bounds()
    }

    /// Returns `true` if a block is cached at `height`.
    pub fn contains(&self, height: u64) -> bool {
        self.window.read().get(height).is_some()
    }

    /// Returns the number of cached blocks.
    pub fn len(&self) -> usize {
        self.window.read().entries.len()
    }

    /// Returns `true` if no blocks are cached.
    pub fn is_empty(&self) -> bool {
        self.window.read().is_empty()
    }

    /// Overwrites the payload cached at `height`, returning `false` if nothing is cached
    /// there.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn corrupt_payload(&self, height: u64, payload: impl Into<Bytes>) -> bool {
        self.window.write().get_mut(height).map(|entry| entry.payload = payload.into()).is_some()
    }
}
