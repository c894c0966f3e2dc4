//! Build-vs-packaged mode and the process-wide snapshot slot.
//!
//! The mode is decided once per process and never re-evaluated. Rather than
//! sniffing runtime identity strings, the decision is explicit: the true
//! entry point either installs an embedded snapshot into the process-wide
//! slot (packaged executables do this before any other code runs) or leaves
//! it empty (build-time invocations). [`RunMode::detect`] only inspects the
//! slot. A misdetection degrades to disk reads; it never hard-fails.

use std::sync::OnceLock;
use tracing::debug;

/// Fixed identifier for the process-wide snapshot slot.
///
/// The generated bootstrap prologue installs the encoded snapshot under the
/// same identifier on its side of the build/run boundary, which is how a
/// packaged executable's startup code finds its embedded files.
pub const SNAPSHOT_SLOT_ID: &str = "PACKBIN_SNAPSHOT";

static SNAPSHOT_SLOT: OnceLock<String> = OnceLock::new();

/// Installs an encoded snapshot into the process-wide slot.
///
/// First write wins: later calls are ignored and return `false`. Population
/// is therefore idempotent and happens at most once per process.
pub fn install_embedded_snapshot(encoded: impl Into<String>) -> bool {
    let installed = SNAPSHOT_SLOT.set(encoded.into()).is_ok();
    if !installed {
        debug!("snapshot slot already populated; ignoring re-install");
    }
    installed
}

/// Returns the encoded snapshot installed in the process-wide slot, if any.
#[must_use]
pub fn embedded_snapshot() -> Option<&'static str> {
    SNAPSHOT_SLOT.get().map(String::as_str)
}

/// Whether this process is a build-time invocation or a previously-compiled
/// standalone executable.
///
/// Determines where the registry draws its initial content from: lazy disk
/// reads in [`RunMode::Build`], a one-time embedded snapshot in
/// [`RunMode::Packaged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunMode {
    /// Build-time script: registry populates lazily from the real filesystem.
    #[default]
    Build,
    /// Compiled standalone executable: registry populates once from the
    /// embedded snapshot.
    Packaged,
}

impl RunMode {
    /// Decides the mode from the process-wide snapshot slot.
    ///
    /// A populated slot means a prior compile step of this same system
    /// produced the running executable. Call once at the true entry point
    /// and thread the result through; the decision is not re-evaluated.
    #[must_use]
    pub fn detect() -> Self {
        if embedded_snapshot().is_some() {
            Self::Packaged
        } else {
            Self::Build
        }
    }

    /// Returns `true` for [`RunMode::Packaged`].
    #[must_use]
    pub const fn is_packaged(self) -> bool {
        matches!(self, Self::Packaged)
    }
}
