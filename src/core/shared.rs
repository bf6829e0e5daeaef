//! Thread-safe handle to a chain
//!
//! `Blockchain::append` reads the tail and then pushes, which is not atomic.
//! Writers that share a chain go through this handle so that the whole
//! read-tail/build/push sequence runs under a single write lock.

use crate::core::block::Block;
use crate::core::blockchain::{Blockchain, BlockchainError, ChainFault};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

/// Shared, lock-guarded chain
#[derive(Debug)]
pub struct SharedBlockchain<T> {
    inner: Arc<RwLock<Blockchain<T>>>,
}

impl<T> Clone for SharedBlockchain<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<Blockchain<T>> for SharedBlockchain<T> {
    fn from(chain: Blockchain<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(chain)),
        }
    }
}

impl<T: Default> SharedBlockchain<T> {
    pub fn new() -> Self {
        Blockchain::new().into()
    }
}

impl<T: Default> Default for SharedBlockchain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SharedBlockchain<T> {
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` against the chain while holding the read lock
    pub fn read<R>(&self, f: impl FnOnce(&Blockchain<T>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<T: Clone> SharedBlockchain<T> {
    /// Copy of the blocks as they are right now
    pub fn snapshot(&self) -> Vec<Block<T>> {
        self.inner.read().blocks().to_vec()
    }
}

impl<T: Serialize> SharedBlockchain<T> {
    /// Append under the write lock, returning the new block's index
    pub fn append(&self, data: T) -> Result<u64, BlockchainError> {
        let mut chain = self.inner.write();
        chain.append(data).map(|block| block.index())
    }

    pub fn validate(&self) -> bool {
        self.inner.read().validate()
    }

    pub fn find_fault(&self) -> Option<ChainFault> {
        self.inner.read().find_fault()
    }
}
