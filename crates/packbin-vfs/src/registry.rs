//! The virtual file registry.
//!
//! A process-lifetime mapping from normalized path to raw byte content; the
//! single source of truth for what file content the system sees. Build-mode
//! misses fall through to the real filesystem and are cached permanently;
//! there is no eviction, which is accepted because builds are short-lived
//! processes.
//!
//! # Examples
//!
//! ```
//! use packbin_vfs::{FileRegistry, RunMode};
//!
//! let mut registry = FileRegistry::new(RunMode::Build);
//! registry.insert("assets/a.txt", b"hi".to_vec()).unwrap();
//!
//! // Inconsistent ./ prefixes resolve to the same entry
//! assert_eq!(registry.read_bytes("./assets/a.txt").unwrap(), b"hi");
//! assert_eq!(registry.read_text("assets/a.txt").unwrap(), "hi");
//! ```

use crate::mode::{self, RunMode};
use crate::resolver;
use crate::snapshot::Snapshot;
use crate::types::{FileEntry, Result, VfsError};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One-shot population state for the embedded snapshot.
///
/// Once `Initialized`, no further population attempts are possible, even if
/// re-checked; together with [`RunMode`] this guarantees that exactly one
/// population path (disk-driven or snapshot-driven) is taken per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    /// No snapshot has been installed yet.
    #[default]
    Uninitialized,
    /// A snapshot was installed; further installs are ignored.
    Initialized,
}

/// The in-memory path-to-bytes store backing all file reads.
///
/// Explicitly owned and passed by reference to every component that needs
/// file access; there is no ambient global instance. Created empty, lazily
/// populated, never torn down before process exit.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: HashMap<String, FileEntry>,
    mode: RunMode,
    init: InitState,
}

impl FileRegistry {
    /// Creates an empty registry for the given mode.
    #[must_use]
    pub fn new(mode: RunMode) -> Self {
        Self {
            files: HashMap::new(),
            mode,
            init: InitState::Uninitialized,
        }
    }

    /// Creates a registry with the mode detected from the process-wide
    /// snapshot slot, installing the embedded snapshot when present.
    ///
    /// This is the constructor for true entry points. A populated slot that
    /// fails to decode degrades to disk reads with a warning rather than
    /// aborting startup.
    #[must_use]
    pub fn from_environment() -> Self {
        let run_mode = RunMode::detect();
        let mut registry = Self::new(run_mode);
        if run_mode.is_packaged() {
            match mode::embedded_snapshot().map(Snapshot::decode) {
                Some(Ok(snapshot)) => registry.install_snapshot(snapshot),
                Some(Err(error)) => {
                    warn!(%error, "embedded snapshot failed to decode; falling back to disk reads");
                }
                None => {
                    warn!("packaged mode without an embedded snapshot; falling back to disk reads");
                }
            }
        }
        registry
    }

    /// Returns the mode this registry was created with.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Returns `true` once an embedded snapshot has been installed.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        matches!(self.init, InitState::Initialized)
    }

    /// Installs a snapshot as the registry's initial content.
    ///
    /// Idempotent: population occurs at most once per registry. A second
    /// call is a logged no-op, so re-running startup code cannot duplicate
    /// or clobber entries.
    pub fn install_snapshot(&mut self, snapshot: Snapshot) {
        if self.is_initialized() {
            debug!("registry already initialized; ignoring snapshot install");
            return;
        }
        for (path, bytes) in snapshot.into_entries() {
            self.files.insert(path, FileEntry::new(bytes));
        }
        self.init = InitState::Initialized;
        debug!(entries = self.files.len(), "registry initialized from snapshot");
    }

    /// Stores content directly under a reference's canonical key.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` for an empty reference.
    pub fn insert(&mut self, reference: &str, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let key = resolver::canonical_key(reference)?;
        self.files.insert(key, FileEntry::new(bytes));
        Ok(())
    }

    /// Returns `true` if any fallback key for the reference has an entry.
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        resolver::canonical_key(reference).is_ok_and(|key| {
            resolver::candidate_keys(&key)
                .iter()
                .any(|candidate| self.files.contains_key(candidate))
        })
    }

    /// Returns the number of entries currently held.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Resolves a reference to its byte content, loading from disk on miss.
    ///
    /// Fallback keys are probed in order; on a full miss the real
    /// filesystem is consulted and a hit is cached under the *canonical*
    /// key only, never retroactively under a fallback. Disk fallback
    /// applies in packaged mode too, as the degraded path when the
    /// embedded snapshot is missing an entry.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` for an empty reference,
    /// `VfsError::Io` if a disk read fails, and `VfsError::FileNotFound`
    /// when neither an entry nor a real file exists.
    pub fn read_bytes(&mut self, reference: &str) -> Result<&[u8]> {
        let key = resolver::canonical_key(reference)?;

        let hit = resolver::candidate_keys(&key)
            .into_iter()
            .find(|candidate| self.files.contains_key(candidate));
        if let Some(hit) = hit {
            return Ok(self.files[&hit].bytes());
        }

        if Path::new(&key).is_file() {
            let bytes = fs::read(&key).map_err(|source| VfsError::Io {
                path: key.clone(),
                source,
            })?;
            debug!(path = %key, size = bytes.len(), "captured file into registry");
            let entry = self
                .files
                .entry(key)
                .or_insert_with(|| FileEntry::new(bytes));
            return Ok(entry.bytes());
        }

        Err(VfsError::FileNotFound { path: key })
    }

    /// Resolves a reference to text, replacing malformed UTF-8 sequences.
    ///
    /// Decoding is best-effort; callers must not assume strict validation.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FileRegistry::read_bytes`].
    pub fn read_text(&mut self, reference: &str) -> Result<String> {
        self.read_bytes(reference)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Deferred flavor of [`FileRegistry::read_bytes`].
    ///
    /// Wraps the synchronous result; no I/O actually suspends.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FileRegistry::read_bytes`].
    #[allow(clippy::unused_async)] // deferred signature; the body never suspends
    pub async fn read_bytes_deferred(&mut self, reference: &str) -> Result<Vec<u8>> {
        self.read_bytes(reference).map(<[u8]>::to_vec)
    }

    /// Deferred flavor of [`FileRegistry::read_text`].
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FileRegistry::read_bytes`].
    #[allow(clippy::unused_async)] // deferred signature; the body never suspends
    pub async fn read_text_deferred(&mut self, reference: &str) -> Result<String> {
        self.read_text(reference)
    }

    /// Stores the content readable at `old` under `new`'s canonical key.
    ///
    /// Copy semantics: the `old` entry is not deleted and remains readable
    /// afterwards. Reading `old` may populate it from disk as a side
    /// effect, exactly as [`FileRegistry::read_bytes`] would.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures for `old` and rejects an empty `new`
    /// reference with `VfsError::InvalidPath`.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let bytes = self.read_bytes(old)?.to_vec();
        let key = resolver::canonical_key(new)?;
        debug!(from = old, to = %key, "copying registry entry");
        self.files.insert(key, FileEntry::new(bytes));
        Ok(())
    }

    /// Produces a snapshot of every currently-held entry.
    ///
    /// Lossless: no entry is added, removed, or altered relative to the
    /// live registry at the moment of serialization. Entries come out in
    /// sorted key order so the encoded form is reproducible.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut entries = BTreeMap::new();
        for (path, entry) in &self.files {
            entries.insert(path.clone(), entry.bytes().to_vec());
        }
        Snapshot::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_registry() -> FileRegistry {
        FileRegistry::new(RunMode::Build)
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = build_registry();
        assert_eq!(registry.file_count(), 0);
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_insert_and_read() {
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        assert_eq!(registry.read_bytes("a.txt").unwrap(), b"hi");
    }

    #[test]
    fn test_fallback_resolution_interchangeable_keys() {
        // Stored plain, readable with and without the ./ prefix
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        assert_eq!(registry.read_bytes("./a.txt").unwrap(), b"hi");
        assert_eq!(registry.read_bytes("a.txt").unwrap(), b"hi");

        // Stored prefixed, readable stripped
        registry.insert("./b.txt", b"yo".to_vec()).unwrap();
        assert_eq!(registry.read_bytes("b.txt").unwrap(), b"yo");
        assert_eq!(registry.read_bytes("./b.txt").unwrap(), b"yo");
    }

    #[test]
    fn test_read_missing_fails_not_found() {
        let mut registry = build_registry();
        let error = registry
            .read_bytes("no-such-registry-entry-anywhere.bin")
            .unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_empty_reference_rejected_before_lookup() {
        let mut registry = build_registry();
        assert!(registry.read_bytes("").unwrap_err().is_invalid_path());
        assert!(registry.read_text("").unwrap_err().is_invalid_path());
    }

    #[test]
    fn test_read_text_lossy() {
        let mut registry = build_registry();
        registry.insert("bad.bin", vec![b'h', 0xFF, b'i']).unwrap();
        assert_eq!(registry.read_text("bad.bin").unwrap(), "h\u{FFFD}i");
    }

    #[test]
    fn test_rename_is_additive() {
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        registry.rename("a.txt", "c.txt").unwrap();

        // Copy, not move: both keys resolve to identical content
        assert_eq!(registry.read_bytes("a.txt").unwrap(), b"hi");
        assert_eq!(registry.read_bytes("c.txt").unwrap(), b"hi");
        assert_eq!(registry.file_count(), 2);
    }

    #[test]
    fn test_rename_missing_source() {
        let mut registry = build_registry();
        let error = registry.rename("ghost.txt", "c.txt").unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(registry.file_count(), 0);
    }

    #[test]
    fn test_install_snapshot_idempotent() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("a.txt", b"hi".to_vec());

        let mut registry = FileRegistry::new(RunMode::Packaged);
        registry.install_snapshot(snapshot.clone());
        assert!(registry.is_initialized());
        assert_eq!(registry.file_count(), 1);

        // Second install must not duplicate or clobber anything
        let mut late = Snapshot::new();
        late.insert("late.txt", b"nope".to_vec());
        registry.install_snapshot(late);
        assert_eq!(registry.file_count(), 1);
        assert!(!registry.contains("late.txt"));
        assert_eq!(registry.read_bytes("a.txt").unwrap(), b"hi");
    }

    #[test]
    fn test_snapshot_round_trip_through_codec() {
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        registry.insert("b.bin", vec![0, 255, 128]).unwrap();
        registry.insert("empty", Vec::new()).unwrap();

        let encoded = registry.snapshot().encode().unwrap();
        let mut restored = FileRegistry::new(RunMode::Packaged);
        restored.install_snapshot(Snapshot::decode(&encoded).unwrap());

        assert_eq!(restored.read_bytes("a.txt").unwrap(), b"hi");
        assert_eq!(restored.read_bytes("b.bin").unwrap(), [0, 255, 128]);
        assert_eq!(restored.read_bytes("empty").unwrap(), b"");
        assert_eq!(restored.file_count(), 3);
    }

    #[test]
    fn test_contains() {
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        assert!(registry.contains("a.txt"));
        assert!(registry.contains("./a.txt"));
        assert!(!registry.contains("b.txt"));
        assert!(!registry.contains(""));
    }

    #[tokio::test]
    async fn test_deferred_forms_wrap_sync_result() {
        let mut registry = build_registry();
        registry.insert("a.txt", b"hi".to_vec()).unwrap();
        assert_eq!(registry.read_bytes_deferred("a.txt").await.unwrap(), b"hi");
        assert_eq!(registry.read_text_deferred("./a.txt").await.unwrap(), "hi");
        assert!(
            registry
                .read_bytes_deferred("missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
