//! Ledger CLI Application
//!
//! Builds small hash-linked chains, prints them and validates them.

use clap::{Parser, Subcommand};
use ledger_chain::cli::{self, RenderOptions};

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A minimal append-only, hash-linked ledger", long_about = None)]
struct Cli {
    /// Shorten hashes to their first 16 hex characters
    #[arg(long, global = true)]
    short_hashes: bool,

    /// Print the chain as JSON instead of the block listing
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sample transaction chain
    Demo,

    /// Build a chain from text entries
    Build {
        /// Entry to append, repeat for more blocks
        #[arg(short, long = "entry")]
        entries: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let options = RenderOptions {
        full_hashes: !cli.short_hashes,
        json: cli.json,
    };

    match cli.command {
        Commands::Demo => cli::cmd_demo(&options)?,
        Commands::Build { entries } => cli::cmd_build(&entries, &options)?,
    }

    Ok(())
}
