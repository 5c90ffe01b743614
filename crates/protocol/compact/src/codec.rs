//! RLP implementation of [`BlockCodec`].

use crate::{BlockCodec, BlockRecord, CodecError};
use alloc::vec::Vec;
use alloy_primitives::Bytes;
use alloy_rlp::{Decodable, Encodable};
use core::{fmt, marker::PhantomData};

/// Encodes records as RLP, optionally bounding the size of a single payload.
pub struct RlpCodec<T> {
    max_payload_size: Option<usize>,
    _record: PhantomData<fn() -> T>,
}

impl<T> RlpCodec<T> {
    /// Creates a codec without a payload size bound.
    pub const fn new() -> Self {
        Self { max_payload_size: None, _record: PhantomData }
    }

    /// Creates a codec that rejects records whose encoding exceeds `max` bytes.
    pub const fn with_max_payload_size(max: usize) -> Self {
        Self { max_payload_size: Some(max), _record: PhantomData }
    }

    /// Returns the configured payload bound, if any.
    pub const fn max_payload_size(&self) -> Option<usize> {
        self.max_payload_size
    }
}

impl<T> Default for RlpCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RlpCodec<T> {
    fn clone(&self) -> Self {
        Self { max_payload_size: self.max_payload_size, _record: PhantomData }
    }
}

impl<T> fmt::Debug for RlpCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RlpCodec").field("max_payload_size", &self.max_payload_size).finish()
    }
}

impl<T> BlockCodec for RlpCodec<T>
where
    T: BlockRecord + Encodable + Decodable,
{
    type Block = T;
    type Error = CodecError;

    fn encode(&self, block: &T) -> Result<Bytes, CodecError> {
        let size = block.length();
        if let Some(max) = self.max_payload_size
            && size > max
        {
            return Err(CodecError::PayloadTooLarge { size, max });
        }

        let mut buf = Vec::with_capacity(size);
        block.encode(&mut buf);
        Ok(buf.into())
    }

    fn decode(&self, payload: &[u8]) -> Result<T, CodecError> {
        let mut buf = payload;
        let block = T::decode(&mut buf)?;
        if !buf.is_empty() {
            return Err(CodecError::TrailingBytes(buf.len()));
        }
        Ok(block)
    }
}
