//! Cryptographic utilities for the ledger
//!
//! This module provides SHA-256 hashing and the block hash type.

pub mod hash;

pub use hash::{sha256, sha256_hex, BlockHash, HASH_SIZE};
