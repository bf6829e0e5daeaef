//! CLI commands for the ledger
//!
//! Implements the command handlers and the human-readable chain rendering.

use crate::core::canonical::Finite;
use crate::core::{Blockchain, BlockchainError, ChainFault};
use crate::crypto::BlockHash;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Write as _};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Number of hex characters kept when hashes are shortened
pub const SHORT_HASH_LEN: usize = 16;

/// Sample payload used by the demo chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleTransaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl SampleTransaction {
    pub fn new(from: &str, to: &str, amount: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }
}

/// Rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Print full hashes instead of a 16 character prefix
    pub full_hashes: bool,
    /// Print the chain as pretty JSON instead of the block listing
    pub json: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            full_hashes: true,
            json: false,
        }
    }
}

fn format_hash(hash: &BlockHash, options: &RenderOptions) -> String {
    if hash.is_empty() {
        return "-".to_string();
    }
    let mut hex = hash.to_hex();
    if !options.full_hashes {
        hex.truncate(SHORT_HASH_LEN);
    }
    hex
}

/// Render every block with its links, genesis first
pub fn render_chain<T>(chain: &Blockchain<T>, options: &RenderOptions) -> CliResult<String>
where
    T: Serialize + Debug,
{
    if options.json {
        return Ok(serde_json::to_string_pretty(&Finite(chain))?);
    }

    let mut out = String::from("Blockchain:\n");
    for block in chain {
        let hash = block.hash().map_err(|source| BlockchainError::Unhashable {
            index: block.index(),
            source,
        })?;

        writeln!(out, "Index: {}", block.index())?;
        writeln!(out, "Timestamp: {}", block.timestamp())?;
        writeln!(out, "Data: {:?}", block.data())?;
        writeln!(
            out,
            "Previous Hash:\n{}",
            format_hash(block.previous_hash(), options)
        )?;
        writeln!(out, "Self Hash:\n{}", format_hash(&hash, options))?;
        writeln!(out, "{}", "-".repeat(64))?;
    }

    Ok(out)
}

/// Print a validation verdict for the chain, failing if it is invalid
fn report_validation<T: Serialize>(chain: &Blockchain<T>) -> Result<(), ChainFault> {
    println!("🔍 Validating blockchain...");

    match chain.find_fault() {
        None => {
            println!("✅ Blockchain is valid!");
            println!("   {} blocks verified", chain.len());
            Ok(())
        }
        Some(fault) => {
            println!("❌ Blockchain validation FAILED!");
            println!("   {}", fault);
            Err(fault)
        }
    }
}

/// Build the sample chain of two transactions
pub fn demo_chain() -> Result<Blockchain<SampleTransaction>, BlockchainError> {
    let mut chain = Blockchain::new();
    chain.append(SampleTransaction::new("Alice", "Bob", 1.0))?;
    chain.append(SampleTransaction::new("Bob", "Charlie", 0.5))?;
    Ok(chain)
}

/// Build a chain from free-form text entries
pub fn entries_chain(entries: &[String]) -> Result<Blockchain<String>, BlockchainError> {
    let mut chain = Blockchain::new();
    for entry in entries {
        chain.append(entry.clone())?;
    }
    Ok(chain)
}

/// Build, print and validate the sample transaction chain
pub fn cmd_demo(options: &RenderOptions) -> CliResult<()> {
    let chain = demo_chain()?;
    log::info!("Built demo chain with {} blocks", chain.len());

    println!("{}", render_chain(&chain, options)?);
    report_validation(&chain)?;

    Ok(())
}

/// Build, print and validate a chain of text entries
pub fn cmd_build(entries: &[String], options: &RenderOptions) -> CliResult<()> {
    if entries.is_empty() {
        log::warn!("No entries given, chain holds only the genesis block");
    }

    let chain = entries_chain(entries)?;
    log::info!("Built chain with {} blocks", chain.len());

    println!("{}", render_chain(&chain, options)?);
    report_validation(&chain)?;

    Ok(())
}
