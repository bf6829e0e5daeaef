//! Block implementation for the ledger
//!
//! A block is an immutable record: its position in the chain, creation time,
//! an opaque payload and the hash of its predecessor. The block's own hash is
//! derived from those fields on demand and is never stored.

use crate::core::canonical::Finite;
use crate::crypto::BlockHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Block encoding errors
#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Failed to encode block: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A block in the chain
///
/// Field declaration order is the canonical encoding order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block<T> {
    /// Position in the chain, genesis is 0
    index: u64,
    /// Creation time, trusted as given
    timestamp: DateTime<Utc>,
    /// Opaque payload
    data: T,
    /// Content hash of the preceding block
    previous_hash: BlockHash,
}

impl<T> Block<T> {
    /// Create a block from its parts.
    ///
    /// Nothing is checked here; the chain is responsible for handing in the
    /// right index and predecessor hash.
    pub fn new(index: u64, timestamp: DateTime<Utc>, data: T, previous_hash: BlockHash) -> Self {
        Self {
            index,
            timestamp,
            data,
            previous_hash,
        }
    }

    /// Create the genesis block
    pub fn genesis(data: T) -> Self {
        Self::new(0, Utc::now(), data, BlockHash::EMPTY)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn previous_hash(&self) -> &BlockHash {
        &self.previous_hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_empty()
    }
}

impl<T: Serialize> Block<T> {
    /// Canonical byte encoding of the block's fields.
    ///
    /// Compact JSON of `{index, timestamp, data, previous_hash}`. The payload
    /// has to serialize deterministically for the hash to be stable, so
    /// prefer ordered maps over `HashMap` inside `T`. NaN and infinite
    /// floats have no JSON form and are rejected as encoding errors.
    pub fn encode(&self) -> Result<Vec<u8>, BlockError> {
        Ok(serde_json::to_vec(&Finite(self))?)
    }

    /// Calculate the content hash of the block (SHA-256 of [`Block::encode`])
    pub fn hash(&self) -> Result<BlockHash, BlockError> {
        Ok(BlockHash::digest(&self.encode()?))
    }
}
