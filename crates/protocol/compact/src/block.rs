//! Compact block types served to light wallets.

use crate::BlockRecord;
use alloc::vec::Vec;
use alloy_primitives::{B256, Bytes};
use alloy_rlp::{RlpDecodable, RlpEncodable};

/// A pruned block carrying only what a light wallet needs to scan for its notes.
#[derive(Debug, Clone, PartialEq, Eq, Default, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CompactBlock {
    /// Version of the compact format this record was produced with.
    pub proto_version: u32,
    /// The block height.
    pub height: u64,
    /// The block hash.
    pub hash: B256,
    /// The parent block hash.
    pub prev_hash: B256,
    /// The block timestamp.
    pub time: u32,
    /// The serialized block header, if the source provided one.
    pub header: Bytes,
    /// The compact transactions of the block.
    pub vtx: Vec<CompactTx>,
}

impl CompactBlock {
    /// Returns a block at `height` with the given hash linkage and no transactions.
    pub fn new(height: u64, hash: B256, prev_hash: B256) -> Self {
        Self { height, hash, prev_hash, ..Default::default() }
    }

    /// Returns the number of shielded outputs across all transactions.
    pub fn output_count(&self) -> usize {
        self.vtx.iter().map(|tx| tx.outputs.len()).sum()
    }
}

impl BlockRecord for CompactBlock {
    fn hash(&self) -> &[u8] {
        self.hash.as_slice()
    }

    fn prev_hash(&self) -> &[u8] {
        self.prev_hash.as_slice()
    }
}

/// A transaction reduced to its shielded spends and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Default, RlpEncodable, RlpDecodable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CompactTx {
    /// Index of the transaction within its block.
    pub index: u64,
    /// The transaction id.
    pub hash: B256,
    /// The transaction fee, if known.
    pub fee: u32,
    /// Nullifiers of the spends.
    pub spends: Vec<Bytes>,
    /// Compact outputs: note commitment, ephemeral key and truncated ciphertext.
    pub outputs: Vec<Bytes>,
}
