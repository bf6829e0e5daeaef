//! Core ledger components
//!
//! - Blocks (immutable records with a derived content hash)
//! - Blockchain (append-only chain with full revalidation)
//! - Canonical encoding guard against non-finite floats
//! - Shared handle for chains with more than one writer

pub mod block;
pub mod blockchain;
pub mod canonical;
pub mod shared;

pub use block::{Block, BlockError};
pub use blockchain::{Blockchain, BlockchainError, ChainFault, ChainStats, FaultKind};
pub use shared::SharedBlockchain;
