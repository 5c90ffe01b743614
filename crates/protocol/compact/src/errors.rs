//! Error types for block codecs.

use thiserror::Error;

/// An error raised by [`RlpCodec`](crate::RlpCodec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The payload is not a valid RLP encoding of the record.
    #[error("RLP error: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// The encoded record exceeds the configured payload bound.
    #[error("Encoded payload of {size} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge {
        /// Size of the encoded record.
        size: usize,
        /// Configured maximum.
        max: usize,
    },
    /// Bytes remained after the record was decoded.
    #[error("{0} trailing bytes after decoded record")]
    TrailingBytes(usize),
}

