//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 functions used for block content hashes and the
//! `BlockHash` digest type stored in each block's `previous_hash` field.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size in bytes of a SHA-256 digest
pub const HASH_SIZE: usize = 32;

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// A block content hash.
///
/// Real digests are always [`HASH_SIZE`] bytes long. The genesis block links
/// to [`BlockHash::EMPTY`], which holds no bytes at all and therefore can
/// never collide with a digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BlockHash(Vec<u8>);

impl BlockHash {
    /// Sentinel predecessor link of the genesis block
    pub const EMPTY: BlockHash = BlockHash(Vec::new());

    /// Hash arbitrary bytes with SHA-256
    pub fn digest(data: &[u8]) -> Self {
        Self(sha256(data))
    }

    /// True only for the genesis sentinel
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse a hex string produced by [`BlockHash::to_hex`]
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(Self)
    }
}

impl From<Vec<u8>> for BlockHash {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for BlockHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BlockHash::from_hex(&s).map_err(D::Error::custom)
    }
}
