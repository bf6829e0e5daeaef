//! Blockchain implementation
//!
//! The append-only chain that owns its blocks, links each new block to the
//! content hash of its predecessor and re-derives every link on validation.

use crate::core::block::{Block, BlockError};
use crate::crypto::BlockHash;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Blockchain-related errors
#[derive(Error, Debug)]
pub enum BlockchainError {
    #[error("Cannot hash block {index}: {source}")]
    Unhashable {
        index: u64,
        #[source]
        source: BlockError,
    },
}

/// What is wrong at the first inconsistent position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    #[error("genesis must have index 0 and an empty previous hash")]
    BadGenesis,
    #[error("expected index {expected}, found {found}")]
    IndexMismatch { expected: u64, found: u64 },
    #[error("previous hash does not match the preceding block")]
    BrokenLink,
    #[error("preceding block cannot be hashed: {0}")]
    Unhashable(String),
}

/// First inconsistency found while validating a chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chain invalid at position {position}: {kind}")]
pub struct ChainFault {
    pub position: usize,
    pub kind: FaultKind,
}

/// The append-only chain of blocks
#[derive(Debug, Clone, Serialize)]
pub struct Blockchain<T> {
    /// Never empty, position 0 is genesis
    blocks: Vec<Block<T>>,
}

impl<T: Default> Blockchain<T> {
    /// Create a new chain whose genesis block carries `T::default()`
    pub fn new() -> Self {
        Self::with_genesis(T::default())
    }
}

impl<T: Default> Default for Blockchain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Blockchain<T> {
    /// Create a new chain with an explicit genesis payload
    pub fn with_genesis(data: T) -> Self {
        Self {
            blocks: vec![Block::genesis(data)],
        }
    }

    /// Get the genesis block
    pub fn genesis(&self) -> &Block<T> {
        &self.blocks[0]
    }

    /// Get the latest block
    pub fn latest_block(&self) -> &Block<T> {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Get a block by index
    pub fn get_block(&self, index: u64) -> Option<&Block<T>> {
        usize::try_from(index).ok().and_then(|i| self.blocks.get(i))
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: the genesis block is created with the chain
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get blockchain height
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64 - 1
    }

    pub fn blocks(&self) -> &[Block<T>] {
        &self.blocks
    }

    /// Iterate from genesis to tip
    pub fn iter(&self) -> std::slice::Iter<'_, Block<T>> {
        self.blocks.iter()
    }
}

impl<T: Serialize> Blockchain<T> {
    /// Append a new block carrying `data`.
    ///
    /// The tail's hash becomes the new block's `previous_hash`. The new block
    /// must be hashable as well, otherwise nothing is appended.
    pub fn append(&mut self, data: T) -> Result<&Block<T>, BlockchainError> {
        let latest = self.latest_block();
        let previous_hash = latest.hash().map_err(|source| BlockchainError::Unhashable {
            index: latest.index(),
            source,
        })?;

        let block = Block::new(latest.index() + 1, Utc::now(), data, previous_hash);
        let hash = block.hash().map_err(|source| BlockchainError::Unhashable {
            index: block.index(),
            source,
        })?;

        log::debug!("Appending block {} ({})", block.index(), hash);
        self.blocks.push(block);

        Ok(self.latest_block())
    }

    /// Re-derive every link and check index contiguity
    pub fn validate(&self) -> bool {
        match self.find_fault() {
            None => true,
            Some(fault) => {
                log::warn!("{}", fault);
                false
            }
        }
    }

    /// Locate the first inconsistency, if any
    pub fn find_fault(&self) -> Option<ChainFault> {
        let genesis = self.genesis();
        if genesis.index() != 0 || !genesis.previous_hash().is_empty() {
            return Some(ChainFault {
                position: 0,
                kind: FaultKind::BadGenesis,
            });
        }

        for (position, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = position + 1;

            let expected = previous.index() + 1;
            if current.index() != expected {
                return Some(ChainFault {
                    position,
                    kind: FaultKind::IndexMismatch {
                        expected,
                        found: current.index(),
                    },
                });
            }

            let kind = match previous.hash() {
                Ok(hash) if &hash == current.previous_hash() => continue,
                Ok(_) => FaultKind::BrokenLink,
                Err(e) => FaultKind::Unhashable(e.to_string()),
            };
            return Some(ChainFault { position, kind });
        }

        None
    }

    /// Get a block by its content hash
    ///
    /// Fails on the first block that cannot be hashed rather than skipping it.
    pub fn get_block_by_hash(
        &self,
        hash: &BlockHash,
    ) -> Result<Option<&Block<T>>, BlockchainError> {
        for block in &self.blocks {
            let candidate = block.hash().map_err(|source| BlockchainError::Unhashable {
                index: block.index(),
                source,
            })?;
            if &candidate == hash {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }

    /// Get chain statistics
    pub fn stats(&self) -> Result<ChainStats, BlockchainError> {
        let latest = self.latest_block();
        let latest_hash = latest.hash().map_err(|source| BlockchainError::Unhashable {
            index: latest.index(),
            source,
        })?;

        Ok(ChainStats {
            height: self.height(),
            total_blocks: self.blocks.len() as u64,
            genesis_time: *self.genesis().timestamp(),
            latest_time: *latest.timestamp(),
            latest_hash,
        })
    }
}

#[cfg(test)]
impl<T> Blockchain<T> {
    /// Swap the block at `position` for a rebuilt copy
    pub(crate) fn substitute(&mut self, position: usize, block: Block<T>) {
        self.blocks[position] = block;
    }
}

impl<'a, T> IntoIterator for &'a Blockchain<T> {
    type Item = &'a Block<T>;
    type IntoIter = std::slice::Iter<'a, Block<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Chain statistics
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub height: u64,
    pub total_blocks: u64,
    pub genesis_time: DateTime<Utc>,
    pub latest_time: DateTime<Utc>,
    pub latest_hash: BlockHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::tests::Flaky;

    fn chain_with(payloads: &[&str]) -> Blockchain<String> {
        let mut chain = Blockchain::new();
        for payload in payloads {
            chain.append(payload.to_string()).unwrap();
        }
        chain
    }

    #[test]
    fn test_new_blockchain() {
        let chain: Blockchain<String> = Blockchain::new();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        assert_eq!(chain.height(), 0);
        assert_eq!(chain.genesis().index(), 0);
        assert_eq!(chain.genesis().previous_hash(), &BlockHash::EMPTY);
        assert_eq!(chain.genesis().data(), "");
        assert!(chain.validate());
    }

    #[test]
    fn test_explicit_genesis_payload() {
        let chain = Blockchain::with_genesis("root".to_string());
        assert_eq!(chain.genesis().data(), "root");
        assert!(chain.validate());
    }

    #[test]
    fn test_append_links_to_previous_hash() {
        let chain = chain_with(&["A", "B"]);

        assert_eq!(chain.len(), 3);
        assert!(chain.validate());

        let blocks = chain.blocks();
        assert_eq!(blocks[1].previous_hash(), &blocks[0].hash().unwrap());
        assert_eq!(blocks[2].previous_hash(), &blocks[1].hash().unwrap());

        let data: Vec<&str> = chain.iter().map(|b| b.data().as_str()).collect();
        assert_eq!(data, vec!["", "A", "B"]);
    }

    #[test]
    fn test_append_returns_new_tail() {
        let mut chain = chain_with(&[]);
        let block = chain.append("first".to_string()).unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.data(), "first");
        assert_eq!(chain.latest_block().index(), 1);
    }

    #[test]
    fn test_index_contiguity() {
        let mut chain: Blockchain<u64> = Blockchain::new();
        for n in 0..50 {
            chain.append(n).unwrap();
        }

        for (position, block) in chain.iter().enumerate() {
            assert_eq!(block.index(), position as u64);
        }
        assert_eq!(chain.height(), 50);
    }

    #[test]
    fn test_long_chain_validates() {
        let mut chain: Blockchain<u64> = Blockchain::new();
        for n in 0..1000 {
            chain.append(n).unwrap();
        }
        assert!(chain.validate());
        assert_eq!(chain.find_fault(), None);
    }

    #[test]
    fn test_tampered_payload_breaks_next_link() {
        let mut chain = chain_with(&["A", "B"]);
        let original = chain.blocks()[1].clone();
        let forged = Block::new(
            original.index(),
            *original.timestamp(),
            "A'".to_string(),
            original.previous_hash().clone(),
        );
        chain.substitute(1, forged);

        assert!(!chain.validate());
        assert_eq!(
            chain.find_fault(),
            Some(ChainFault {
                position: 2,
                kind: FaultKind::BrokenLink
            })
        );
    }

    #[test]
    fn test_tampered_previous_hash_detected() {
        let mut chain = chain_with(&["A"]);
        let original = chain.blocks()[1].clone();
        let forged = Block::new(
            original.index(),
            *original.timestamp(),
            original.data().clone(),
            BlockHash::digest(b"forged"),
        );
        chain.substitute(1, forged);

        assert!(!chain.validate());
        assert_eq!(chain.find_fault().map(|f| f.position), Some(1));
    }

    #[test]
    fn test_tampered_tail_is_not_detected() {
        // Nothing links to the tip, so rewriting its payload alone is invisible
        let mut chain = chain_with(&["A"]);
        let original = chain.blocks()[1].clone();
        let forged = Block::new(
            original.index(),
            *original.timestamp(),
            "Z".to_string(),
            original.previous_hash().clone(),
        );
        chain.substitute(1, forged);

        assert!(chain.validate());
    }

    #[test]
    fn test_index_gap_detected() {
        let mut chain = chain_with(&["A", "B"]);
        let previous_hash = chain.blocks()[1].hash().unwrap();
        let original = chain.blocks()[2].clone();
        let forged = Block::new(
            5,
            *original.timestamp(),
            original.data().clone(),
            previous_hash,
        );
        chain.substitute(2, forged);

        assert_eq!(
            chain.find_fault(),
            Some(ChainFault {
                position: 2,
                kind: FaultKind::IndexMismatch {
                    expected: 2,
                    found: 5
                }
            })
        );
    }

    #[test]
    fn test_bad_genesis_detected() {
        let mut chain = chain_with(&[]);
        let genesis = chain.genesis().clone();
        let forged = Block::new(
            0,
            *genesis.timestamp(),
            genesis.data().clone(),
            BlockHash::digest(b"not a sentinel"),
        );
        chain.substitute(0, forged);

        assert_eq!(chain.find_fault().map(|f| f.kind), Some(FaultKind::BadGenesis));
    }

    #[test]
    fn test_unencodable_payload_rejected() {
        let mut chain: Blockchain<Flaky> = Blockchain::new();
        chain.append(Flaky::Fine(1)).unwrap();

        let err = chain.append(Flaky::Broken).unwrap_err();
        assert!(matches!(err, BlockchainError::Unhashable { index: 2, .. }));

        // Nothing was appended and the chain keeps working
        assert_eq!(chain.len(), 2);
        assert!(chain.validate());
        chain.append(Flaky::Fine(2)).unwrap();
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_unhashable_genesis_rejects_append() {
        let mut chain = Blockchain::with_genesis(Flaky::Broken);
        let err = chain.append(Flaky::Fine(1)).unwrap_err();
        assert!(matches!(err, BlockchainError::Unhashable { index: 0, .. }));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_get_block_by_hash() {
        let chain = chain_with(&["A", "B"]);
        let target = chain.blocks()[1].hash().unwrap();

        let found = chain.get_block_by_hash(&target).unwrap().unwrap();
        assert_eq!(found.data(), "A");
        assert!(chain.get_block_by_hash(&BlockHash::EMPTY).unwrap().is_none());
        assert!(chain.get_block(2).is_some());
        assert!(chain.get_block(3).is_none());
    }

    #[test]
    fn test_get_block_by_hash_reports_unhashable_blocks() {
        let chain = Blockchain::with_genesis(Flaky::Broken);
        let err = chain.get_block_by_hash(&BlockHash::EMPTY).unwrap_err();
        assert!(matches!(err, BlockchainError::Unhashable { index: 0, .. }));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let chain = chain_with(&["A", "B"]);
        let first: Vec<u64> = chain.iter().map(|b| b.index()).collect();
        let second: Vec<u64> = (&chain).into_iter().map(|b| b.index()).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(first, second);

        let mut count = 0;
        for _ in &chain {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_fault_display() {
        let fault = ChainFault {
            position: 4,
            kind: FaultKind::IndexMismatch {
                expected: 4,
                found: 7,
            },
        };
        assert_eq!(
            fault.to_string(),
            "Chain invalid at position 4: expected index 4, found 7"
        );
    }

    #[test]
    fn test_stats() {
        let chain = chain_with(&["A", "B"]);
        let stats = chain.stats().unwrap();
        assert_eq!(stats.height, 2);
        assert_eq!(stats.total_blocks, 3);
        assert_eq!(stats.latest_hash, chain.latest_block().hash().unwrap());
        assert!(stats.latest_time >= stats.genesis_time);
    }
}
