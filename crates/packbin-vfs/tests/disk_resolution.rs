//! Integration tests for disk-backed registry resolution.
//!
//! Exercises the build-mode path against a real temporary filesystem:
//! lazy capture, canonical-key caching, and the packaged-mode round trip
//! through the snapshot codec.

use packbin_vfs::{FileRegistry, RunMode, Snapshot};
use std::fs;
use tempfile::TempDir;

fn fixture() -> (TempDir, String, String) {
    let dir = TempDir::new().expect("create temp dir");
    let text_path = dir.path().join("a.txt");
    let bin_path = dir.path().join("b.bin");
    fs::write(&text_path, b"hi").expect("write a.txt");
    fs::write(&bin_path, [0u8, 255, 128]).expect("write b.bin");
    (
        dir,
        text_path.to_string_lossy().into_owned(),
        bin_path.to_string_lossy().into_owned(),
    )
}

#[test]
fn miss_falls_through_to_disk_and_caches() {
    let (_dir, text_path, bin_path) = fixture();
    let mut registry = FileRegistry::new(RunMode::Build);

    assert_eq!(registry.read_bytes(&text_path).unwrap(), b"hi");
    assert_eq!(registry.read_bytes(&bin_path).unwrap(), [0, 255, 128]);
    assert_eq!(registry.file_count(), 2);
}

#[test]
fn cached_entry_shadows_later_disk_changes() {
    let (_dir, text_path, _) = fixture();
    let mut registry = FileRegistry::new(RunMode::Build);

    assert_eq!(registry.read_text(&text_path).unwrap(), "hi");

    // The registry is the source of truth once captured; a later disk
    // write must not leak into reads within the same process.
    fs::write(&text_path, b"changed").expect("rewrite a.txt");
    assert_eq!(registry.read_text(&text_path).unwrap(), "hi");
}

/// Restores the working directory it was constructed in, even on panic.
///
/// The cwd is process-global state; the sibling tests in this binary use
/// absolute paths only, so the temporary change cannot affect them.
struct CwdGuard(std::path::PathBuf);

impl CwdGuard {
    fn enter(dir: &std::path::Path) -> Self {
        let original = std::env::current_dir().expect("read cwd");
        std::env::set_current_dir(dir).expect("enter temp dir");
        Self(original)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
fn disk_read_stores_under_canonical_key_only() {
    let (dir, _, _) = fixture();
    let relative = "a.txt";
    let _guard = CwdGuard::enter(dir.path());

    let mut registry = FileRegistry::new(RunMode::Build);
    let prefixed = format!("./{relative}");
    assert_eq!(registry.read_bytes(&prefixed).unwrap(), b"hi");

    // Stored under the canonical key "./a.txt"; the stripped form still
    // resolves through the fallback probes without creating a new entry.
    assert_eq!(registry.read_bytes(relative).unwrap(), b"hi");
    assert_eq!(registry.file_count(), 1);
}

#[test]
fn missing_file_is_not_found() {
    let (dir, _, _) = fixture();
    let ghost = dir.path().join("ghost.txt");
    let mut registry = FileRegistry::new(RunMode::Build);

    let error = registry
        .read_bytes(&ghost.to_string_lossy())
        .unwrap_err();
    assert!(error.is_not_found());
}

#[test]
fn capture_then_reconstitute_in_packaged_registry() {
    let (_dir, text_path, bin_path) = fixture();
    let mut build_registry = FileRegistry::new(RunMode::Build);
    build_registry.read_bytes(&text_path).unwrap();
    build_registry.read_bytes(&bin_path).unwrap();

    let encoded = build_registry.snapshot().encode().unwrap();

    // The packaged side never touches disk for these entries
    let mut packaged = FileRegistry::new(RunMode::Packaged);
    packaged.install_snapshot(Snapshot::decode(&encoded).unwrap());
    assert!(packaged.is_initialized());
    assert_eq!(packaged.read_bytes(&text_path).unwrap(), b"hi");
    assert_eq!(packaged.read_bytes(&bin_path).unwrap(), [0, 255, 128]);
}
