//! Asset-embedding compile pipeline for packbin.
//!
//! Orchestrates the one-shot build that turns an entry module plus a set of
//! content folders into a single self-contained executable: walk the
//! folders, capture their bytes into the virtual file registry, freeze the
//! registry into a bootstrap prologue, append the bundled program, and hand
//! the combined artifact to the external ahead-of-time compiler.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod bootstrap;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod toolchain;

pub use error::{PipelineError, Result};
pub use options::{CompileOptions, ToolchainConfig};
pub use pipeline::{CompileReport, capture_folders, compile};
pub use toolchain::{Bundler, CommandBundler, ToolOutcome};
