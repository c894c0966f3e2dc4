//! The compile orchestrator.
//!
//! Strictly sequential stages with no backtracking: discovery & capture,
//! bootstrap generation, bundling, native compilation, cleanup. Only the
//! first two read stages may fail loudly; once a compiler invocation has
//! been attempted, cleanup always runs.

use crate::bootstrap;
use crate::error::{PipelineError, Result};
use crate::options::CompileOptions;
use crate::toolchain::{self, Bundler, ToolOutcome};
use packbin_vfs::{FileRegistry, resolver};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What one compile invocation did and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    /// `true` when the process was already a packaged executable and the
    /// whole pipeline was skipped.
    pub skipped: bool,
    /// The output name handed to the compiler, when one was derived.
    pub output_name: Option<String>,
    /// Number of registry entries embedded in the bootstrap snapshot.
    pub embedded_files: usize,
    /// Native Compilation outcome; `None` when no compiler was invoked.
    pub outcome: Option<ToolOutcome>,
}

impl CompileReport {
    const fn skipped_packaged() -> Self {
        Self {
            skipped: true,
            output_name: None,
            embedded_files: 0,
            outcome: None,
        }
    }

    /// Returns `true` when the compiler ran and produced an executable.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Some(ToolOutcome::Success))
    }
}

/// Recursively captures every regular file under the given roots.
///
/// Each file is forced through the registry's resolve-or-load path, so the
/// registry holds its bytes before serialization. Enumeration order is
/// stabilized by file name; the registry does not care, but deterministic
/// logs are easier to compare.
///
/// # Errors
///
/// Returns `PipelineError::Io` for walk failures and propagates registry
/// read errors; Discovery & Capture is allowed to fail loudly.
pub fn capture_folders(registry: &mut FileRegistry, folders: &[PathBuf]) -> Result<usize> {
    let mut captured = 0;
    for root in folders {
        debug!(root = %root.display(), "walking content folder");
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| PipelineError::Io {
                path: root.display().to_string(),
                source: source.into(),
            })?;
            if entry.file_type().is_file() {
                let reference = entry.path().to_string_lossy().into_owned();
                registry.read_bytes(&reference)?;
                captured += 1;
            }
        }
    }
    Ok(captured)
}

fn derive_output_name(options: &CompileOptions) -> Result<String> {
    if let Some(name) = &options.output {
        return Ok(name.clone());
    }
    options
        .entry_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| PipelineError::InvalidEntry {
            path: options.entry_path.display().to_string(),
        })
}

fn artifact_dir(entry_path: &Path) -> PathBuf {
    let entry = entry_path.to_string_lossy();
    let parent = resolver::parent_dir(&entry);
    if parent.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(parent)
    }
}

/// Runs the full capture-and-rebuild pipeline for one set of options.
///
/// A no-op when the registry is in packaged mode: compiling is only
/// meaningful at build time, so no file is read, no temporary artifact is
/// created, and no subprocess is spawned. Otherwise the stages run in
/// order, the bootstrap artifact lives in the entry point's directory for
/// the duration of the invocation, and it is deleted once compilation has
/// been attempted regardless of the compiler's exit status.
///
/// # Errors
///
/// Propagates `FlagConflict` (checked before any file is read), capture
/// failures, bootstrap write failures, and bundling failures. Native
/// Compilation failures are *not* errors; inspect
/// [`CompileReport::outcome`].
pub fn compile(
    registry: &mut FileRegistry,
    options: &CompileOptions,
    bundler: &dyn Bundler,
) -> Result<CompileReport> {
    if registry.mode().is_packaged() {
        info!("already running as a packaged executable; compile is a no-op");
        return Ok(CompileReport::skipped_packaged());
    }

    toolchain::check_flags(&options.compiler_flags)?;

    // Stage 1: discovery & capture
    let captured = capture_folders(registry, &options.content_folders)?;
    info!(files = captured, "captured content folders into registry");

    // Stage 2: bootstrap generation
    let output_name = derive_output_name(options)?;
    let snapshot = registry.snapshot();
    let embedded_files = snapshot.len();
    let prologue = bootstrap::render_prologue(&snapshot)?;

    let dir = artifact_dir(&options.entry_path);
    let mut artifact = tempfile::Builder::new()
        .prefix(&format!("{output_name}-bootstrap-"))
        .suffix(".js")
        .tempfile_in(&dir)
        .map_err(|source| PipelineError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    write_artifact(&mut artifact, &prologue)?;

    // Stage 3: bundling; program text goes after the prologue so the
    // registry is installed before any top-level program code runs
    let program = bundler.bundle(&options.entry_path)?;
    write_artifact(&mut artifact, &program)?;
    debug!(artifact = %artifact.path().display(), "bootstrap artifact assembled");

    // Stage 4: native compilation
    let outcome = toolchain::compile_artifact(artifact.path(), options, &output_name);

    // Stage 5: cleanup, unconditional once compilation has been attempted
    if let Err(error) = artifact.close() {
        warn!(%error, "failed to delete bootstrap artifact");
    }

    Ok(CompileReport {
        skipped: false,
        output_name: Some(output_name),
        embedded_files,
        outcome: Some(outcome),
    })
}

fn write_artifact(artifact: &mut tempfile::NamedTempFile, text: &str) -> Result<()> {
    let path = artifact.path().display().to_string();
    artifact
        .as_file_mut()
        .write_all(text.as_bytes())
        .and_then(|()| artifact.as_file_mut().flush())
        .map_err(|source| PipelineError::Io { path, source })
}
