#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod cache;
pub use cache::{AddOutcome, WindowCache};

mod config;
pub use config::{DEFAULT_MAX_ENTRIES, WindowCacheConfig};

mod error;
pub use error::WindowCacheError;

mod observer;
pub use observer::{CacheObserver, NoopObserver};

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::{Metrics, MetricsObserver};
