//! Command implementations for the packbin CLI.
//!
//! Each command module executes one subcommand and reports an exit code;
//! argument parsing stays in `main.rs`.

pub mod build;
pub mod completions;
pub mod snapshot;
