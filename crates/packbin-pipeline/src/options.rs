//! Compile options and the optional TOML manifest.
//!
//! [`CompileOptions`] describes exactly one compile invocation and is not
//! persisted anywhere; a `packbin.toml` manifest is just a serialized form
//! of the same struct for callers who prefer configuration files over
//! flags.
//!
//! # Examples
//!
//! ```
//! use packbin_pipeline::CompileOptions;
//!
//! let mut options = CompileOptions::new("main.ts");
//! options.content_folders.push("assets".into());
//! assert_eq!(options.toolchain.command, "deno");
//! ```

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Names the external toolchain used for bundling and ahead-of-time
/// compilation.
///
/// The tool itself is opaque to the pipeline: one binary, two subcommands,
/// success or failure via exit status. Defaults target the Deno toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain binary name or path.
    /// Default: "deno"
    pub command: String,

    /// Subcommand that bundles an entry module into one program text on
    /// stdout.
    /// Default: "bundle"
    pub bundle_subcommand: String,

    /// Subcommand that compiles a source artifact into a native
    /// executable.
    /// Default: "compile"
    pub compile_subcommand: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            command: "deno".to_string(),
            bundle_subcommand: "bundle".to_string(),
            compile_subcommand: "compile".to_string(),
        }
    }
}

/// Configuration for one compile invocation.
///
/// Exists only for the duration of a single [`crate::compile`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Program entry-point module.
    #[serde(rename = "entry")]
    pub entry_path: PathBuf,

    /// Content-folder roots whose regular files are captured into the
    /// registry and embedded in the executable.
    #[serde(rename = "content", default)]
    pub content_folders: Vec<PathBuf>,

    /// Extra compiler flags. Must not contain an explicit output flag;
    /// use [`CompileOptions::output`] instead.
    #[serde(rename = "flags", default)]
    pub compiler_flags: Vec<String>,

    /// Output executable name. Derived from the entry file stem when
    /// absent.
    #[serde(default)]
    pub output: Option<String>,

    /// Positional runtime arguments appended after the compiler's own.
    #[serde(rename = "args", default)]
    pub runtime_args: Vec<String>,

    /// External toolchain naming.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

impl CompileOptions {
    /// Creates options for an entry point with everything else defaulted.
    #[must_use]
    pub fn new(entry_path: impl Into<PathBuf>) -> Self {
        Self {
            entry_path: entry_path.into(),
            content_folders: Vec::new(),
            compiler_flags: Vec::new(),
            output: None,
            runtime_args: Vec::new(),
            toolchain: ToolchainConfig::default(),
        }
    }

    /// Loads options from a `packbin.toml` manifest.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the manifest cannot be read and
    /// `PipelineError::Manifest` if it fails to parse.
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|error| PipelineError::Manifest {
            path: path.display().to_string(),
            message: error.to_string(),
        })
    }
}
