use thiserror::Error;

/// Errors returned by the [`WindowCache`](crate::WindowCache).
#[derive(Debug, Error)]
pub enum WindowCacheError {
    /// The codec failed to encode the block being added.
    ///
    /// Cached heights at or above `height` may already have been truncated when this is
    /// returned; the caller either retries the add or treats ingestion as failed.
    #[error("Failed to encode block at height {height}")]
    Encode {
        /// Height the block was being added at.
        height: u64,
        /// The codec error.
        #[source]
        source: Box<dyn core::error::Error + Send + Sync + 'static>,
    },

    /// The cache configuration is invalid.
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// The cache configuration could not be parsed.
    #[error("Failed to parse cache configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
