//! Error types for the compile pipeline.
//!
//! Discovery and Bundling fail loudly through these variants; Native
//! Compilation failures are deliberately *not* errors; they surface as a
//! typed [`crate::ToolOutcome`] on the compile report so Cleanup always
//! runs.
//!
//! # Examples
//!
//! ```
//! use packbin_pipeline::PipelineError;
//!
//! let error = PipelineError::FlagConflict { flag: "--output".to_string() };
//! assert!(error.is_flag_conflict());
//! ```

use packbin_vfs::VfsError;
use thiserror::Error;

/// Errors that can occur while orchestrating a compile.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The caller supplied a reserved compiler flag directly.
    ///
    /// Output must be set only via the dedicated output option, to avoid
    /// ambiguity. Raised before any file is read or subprocess spawned.
    #[error("Reserved compiler flag supplied by caller: {flag}")]
    FlagConflict {
        /// The offending flag
        flag: String,
    },

    /// The external bundler failed to produce a combined program text.
    #[error("Bundling failed for {entry}: {message}")]
    Bundle {
        /// The entry-point module being bundled
        entry: String,
        /// What went wrong (spawn failure or bundler stderr)
        message: String,
    },

    /// Rendering the bootstrap prologue failed.
    #[error("Bootstrap template error: {message}")]
    Template {
        /// Description of the template failure
        message: String,
    },

    /// A `packbin.toml` manifest could not be parsed.
    #[error("Manifest error in {path}: {message}")]
    Manifest {
        /// Manifest file path
        path: String,
        /// Parse failure description
        message: String,
    },

    /// The entry-point path has no usable file name to derive output from.
    #[error("Cannot derive an output name from entry point: {path}")]
    InvalidEntry {
        /// The unusable entry path
        path: String,
    },

    /// A registry operation failed.
    #[error(transparent)]
    Vfs(#[from] VfsError),

    /// Filesystem work around the transient bootstrap artifact failed.
    #[error("I/O error at {path}")]
    Io {
        /// The path involved
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Returns `true` if this is a reserved-flag conflict.
    #[must_use]
    pub const fn is_flag_conflict(&self) -> bool {
        matches!(self, Self::FlagConflict { .. })
    }

    /// Returns `true` if this is a bundling failure.
    #[must_use]
    pub const fn is_bundle_failure(&self) -> bool {
        matches!(self, Self::Bundle { .. })
    }
}

/// Type alias for pipeline operation results.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flag_conflict() {
        let error = PipelineError::FlagConflict {
            flag: "-o".to_string(),
        };
        assert!(error.is_flag_conflict());
        assert!(!error.is_bundle_failure());
    }

    #[test]
    fn test_vfs_error_converts() {
        let error: PipelineError = VfsError::FileNotFound {
            path: "a.txt".to_string(),
        }
        .into();
        assert!(matches!(error, PipelineError::Vfs(_)));
    }
}
