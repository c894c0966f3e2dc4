//! Core types for the virtual file registry.
//!
//! Defines the registry error taxonomy and the byte-content entry type.
//! Error variants carry contextual information and provide `is_xxx()`
//! methods for classification without pattern matching at call sites.
//!
//! # Examples
//!
//! ```
//! use packbin_vfs::{FileEntry, VfsError};
//!
//! let entry = FileEntry::new(b"hi".to_vec());
//! assert_eq!(entry.bytes(), b"hi");
//!
//! let error = VfsError::FileNotFound { path: "missing.txt".to_string() };
//! assert!(error.is_not_found());
//! ```

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Error, Debug)]
pub enum VfsError {
    /// The path reference was empty or otherwise unusable.
    ///
    /// Raised before any I/O or registry access takes place.
    #[error("Invalid path reference: {path:?}")]
    InvalidPath {
        /// The rejected reference
        path: String,
    },

    /// Resolution found neither an in-memory entry nor a real file.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The canonical key that failed to resolve
        path: String,
    },

    /// A real-filesystem read failed for a path that exists.
    #[error("I/O error reading {path}")]
    Io {
        /// The path being read when the error occurred
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An embedded snapshot literal could not be parsed.
    #[error("Snapshot decode failed")]
    SnapshotDecode {
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// A snapshot could not be rendered to its embeddable form.
    #[error("Snapshot encode failed")]
    SnapshotEncode {
        /// Underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

impl VfsError {
    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is a file not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Returns `true` if this is a snapshot codec error (either direction).
    #[must_use]
    pub const fn is_snapshot_codec(&self) -> bool {
        matches!(self, Self::SnapshotDecode { .. } | Self::SnapshotEncode { .. })
    }
}

/// A file entry held by the registry.
///
/// Content is a raw byte sequence, immutable once captured for a given
/// build. Text is only produced on demand, and only best-effort: callers
/// that need strict UTF-8 must validate themselves.
///
/// # Examples
///
/// ```
/// use packbin_vfs::FileEntry;
///
/// let entry = FileEntry::new(vec![0, 255, 128]);
/// assert_eq!(entry.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    bytes: Vec<u8>,
}

impl FileEntry {
    /// Creates an entry from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Returns the raw byte content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Decodes the content as text, replacing malformed UTF-8 sequences.
    #[must_use]
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Type alias for registry operation results.
pub type Result<T> = std::result::Result<T, VfsError>;
