//! The `snapshot` command: capture content folders and print the encoded
//! snapshot literal on stdout.
//!
//! Useful for inspecting exactly what a build would embed, or for piping
//! the literal into other tooling.

use crate::exit::ExitCode;
use anyhow::Result;
use packbin_pipeline::capture_folders;
use packbin_vfs::{FileRegistry, RunMode};
use std::path::PathBuf;
use tracing::info;

/// Runs the snapshot command.
///
/// # Errors
///
/// Returns an error when a folder cannot be walked or a file cannot be
/// read.
pub fn run(folders: &[PathBuf]) -> Result<ExitCode> {
    let mut registry = FileRegistry::new(RunMode::Build);
    let captured = capture_folders(&mut registry, folders)?;
    info!(files = captured, "captured content folders");

    let encoded = registry.snapshot().encode()?;
    println!("{encoded}");
    Ok(ExitCode::SUCCESS)
}
