//! Contains the cache configuration.

use crate::WindowCacheError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// The number of blocks held when no capacity is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 40_000;

/// Configuration for a [`WindowCache`](crate::WindowCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct WindowCacheConfig {
    /// Maximum number of contiguous heights held at once. Must be at least one.
    pub max_entries: usize,
}

impl Default for WindowCacheConfig {
    fn default() -> Self {
        Self { max_entries: DEFAULT_MAX_ENTRIES }
    }
}

impl WindowCacheConfig {
    /// Creates a configuration holding at most `max_entries` blocks.
    pub const fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Parses a configuration from TOML and validates it.
    pub fn from_toml_str(s: &str) -> Result<Self, WindowCacheError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the validated capacity.
    pub fn validate(&self) -> Result<NonZeroUsize, WindowCacheError> {
        NonZeroUsize::new(self.max_entries).ok_or_else(|| {
            WindowCacheError::InvalidConfig("max-entries must be at least 1".to_string())
        })
    }
}
