//! Command-line glue: sample payloads, chain rendering and command handlers

pub mod commands;

pub use commands::{
    cmd_build, cmd_demo, demo_chain, entries_chain, render_chain, CliResult, RenderOptions,
    SampleTransaction, SHORT_HASH_LEN,
};
