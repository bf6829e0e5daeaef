//! Ledger-Chain: a minimal append-only, hash-linked ledger in Rust
//!
//! This crate provides:
//! - Immutable blocks generic over any `serde::Serialize` payload
//! - SHA-256 content hashes derived on demand, never stored
//! - An append-only chain that links every block to its predecessor's hash
//! - Full revalidation that pinpoints the first broken link
//! - A lock-guarded handle for chains with several writers
//!
//! # Example
//!
//! ```rust
//! use ledger_chain::core::Blockchain;
//!
//! // Create a new chain; the genesis block carries String::default()
//! let mut chain: Blockchain<String> = Blockchain::new();
//!
//! chain.append("alice pays bob".to_string()).unwrap();
//! chain.append("bob pays charlie".to_string()).unwrap();
//!
//! assert_eq!(chain.len(), 3);
//! assert!(chain.validate());
//!
//! // Every block links to its predecessor's content hash
//! let blocks = chain.blocks();
//! assert_eq!(blocks[2].previous_hash(), &blocks[1].hash().unwrap());
//! ```

pub mod cli;
pub mod core;
pub mod crypto;

// Re-export commonly used types
pub use crate::core::{
    Block, BlockError, Blockchain, BlockchainError, ChainFault, ChainStats, FaultKind,
    SharedBlockchain,
};
pub use crypto::BlockHash;
