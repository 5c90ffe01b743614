//! Capabilities consumed by the block window cache.

use alloy_primitives::Bytes;

/// A block as seen by the cache: an identity hash and a link to its predecessor.
///
/// The cache never interprets anything else about the record. Hashes are compared
/// byte-for-byte, so implementations must return them in a stable representation.
pub trait BlockRecord {
    /// Returns this block's identity hash.
    fn hash(&self) -> &[u8];

    /// Returns the hash of the block this one builds on.
    fn prev_hash(&self) -> &[u8];
}

/// Turns block records into opaque payload bytes and back.
///
/// Both directions must be pure: the same input always yields the same output, and
/// neither direction may block on external resources.
pub trait BlockCodec: Send + Sync {
    /// The record type this codec handles.
    type Block: BlockRecord;

    /// The error returned when a record cannot be encoded or a payload cannot be decoded.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Encodes a record into its payload bytes.
    fn encode(&self, block: &Self::Block) -> Result<Bytes, Self::Error>;

    /// Decodes payload bytes previously produced by [`BlockCodec::encode`].
    fn decode(&self, payload: &[u8]) -> Result<Self::Block, Self::Error>;
}
