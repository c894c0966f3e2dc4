//! External toolchain invocation: bundler and ahead-of-time compiler.
//!
//! Both tools are opaque collaborators reached through `std::process`.
//! Bundling failures propagate loudly; compilation failures degrade to a
//! typed [`ToolOutcome`] so the orchestrator can always reach Cleanup.

use crate::error::{PipelineError, Result};
use crate::options::{CompileOptions, ToolchainConfig};
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Flags unconditionally appended to every compiler invocation.
///
/// The packaged executable must be able to relax sandboxing and read the
/// filesystem; caller-supplied duplicates are stripped so each appears
/// exactly once.
pub const FORCED_COMPILER_FLAGS: [&str; 2] = ["--unstable", "--allow-read"];

fn is_output_flag(flag: &str) -> bool {
    flag == "-o" || flag == "--output" || flag.starts_with("--output=")
}

/// Rejects caller flag lists that try to set the output directly.
///
/// Output must be set only via the dedicated output option; called before
/// any file is read or subprocess spawned.
///
/// # Errors
///
/// Returns `PipelineError::FlagConflict` naming the offending flag.
pub fn check_flags(flags: &[String]) -> Result<()> {
    for flag in flags {
        if is_output_flag(flag) {
            return Err(PipelineError::FlagConflict { flag: flag.clone() });
        }
    }
    Ok(())
}

/// Merges caller flags with the forced set.
///
/// Caller-supplied copies of forced flags are silently stripped; the
/// forced flags are then appended, so each occurs exactly once and last.
#[must_use]
pub fn merge_flags(flags: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = flags
        .iter()
        .filter(|flag| !FORCED_COMPILER_FLAGS.contains(&flag.as_str()))
        .cloned()
        .collect();
    merged.extend(FORCED_COMPILER_FLAGS.iter().map(ToString::to_string));
    merged
}

/// Result of the Native Compilation stage.
///
/// Spawn and compiler failures are values, not errors: the pipeline logs
/// them and proceeds to Cleanup, and callers decide whether to treat the
/// two identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The compiler ran and exited successfully.
    Success,
    /// The compiler ran but exited unsuccessfully.
    CompilerFailure {
        /// Exit code, when the process was not killed by a signal
        status: Option<i32>,
        /// Captured compiler stderr
        stderr: String,
    },
    /// The compiler process could not be started at all.
    SpawnFailure {
        /// Why the spawn failed
        message: String,
    },
}

impl ToolOutcome {
    /// Returns `true` for a successful compile.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` when the compiler process never started.
    #[must_use]
    pub const fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::SpawnFailure { .. })
    }
}

/// Produces a single combined program text from an entry-point module.
///
/// The seam between the orchestrator and the external bundler; stubbed in
/// tests, [`CommandBundler`] in production.
pub trait Bundler {
    /// Bundles the entry module, returning self-contained program text.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Bundle` when the bundler cannot run or
    /// exits unsuccessfully; bundling is allowed to fail loudly.
    fn bundle(&self, entry: &Path) -> Result<String>;
}

/// Bundler that shells out to the external toolchain and captures stdout.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: String,
    subcommand: String,
}

impl CommandBundler {
    /// Creates a bundler from the toolchain configuration.
    #[must_use]
    pub fn from_toolchain(toolchain: &ToolchainConfig) -> Self {
        Self {
            command: toolchain.command.clone(),
            subcommand: toolchain.bundle_subcommand.clone(),
        }
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, entry: &Path) -> Result<String> {
        info!(command = %self.command, entry = %entry.display(), "bundling entry module");
        let output = Command::new(&self.command)
            .arg(&self.subcommand)
            .arg(entry)
            .output()
            .map_err(|error| PipelineError::Bundle {
                entry: entry.display().to_string(),
                message: format!("failed to spawn {}: {error}", self.command),
            })?;

        if !output.status.success() {
            return Err(PipelineError::Bundle {
                entry: entry.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Invokes the ahead-of-time compiler on the bootstrap artifact.
///
/// Invocation shape: `<command> <compile_subcommand> <merged flags>
/// --output <name> <artifact> <runtime args...>`. Blocks until the
/// compiler process exits; there is no timeout or cancellation.
#[must_use]
pub fn compile_artifact(
    artifact: &Path,
    options: &CompileOptions,
    output_name: &str,
) -> ToolOutcome {
    let toolchain = &options.toolchain;
    let mut command = Command::new(&toolchain.command);
    command.arg(&toolchain.compile_subcommand);
    command.args(merge_flags(&options.compiler_flags));
    command.arg("--output").arg(output_name);
    command.arg(artifact);
    command.args(&options.runtime_args);

    info!(
        command = %toolchain.command,
        artifact = %artifact.display(),
        output = output_name,
        "invoking ahead-of-time compiler"
    );

    match command.output() {
        Ok(output) if output.status.success() => {
            info!(output = output_name, "compile succeeded");
            ToolOutcome::Success
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = ?output.status.code(), %stderr, "compiler exited unsuccessfully");
            ToolOutcome::CompilerFailure {
                status: output.status.code(),
                stderr,
            }
        }
        Err(error) => {
            let message = which::which(&toolchain.command).map_or_else(
                |_| format!("{} not found on PATH: {error}", toolchain.command),
                |resolved| format!("failed to spawn {}: {error}", resolved.display()),
            );
            warn!(%message, "compiler process could not be started");
            ToolOutcome::SpawnFailure { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_check_flags_accepts_ordinary_flags() {
        assert!(check_flags(&flags(&["--no-check", "--quiet"])).is_ok());
        assert!(check_flags(&[]).is_ok());
    }

    #[test]
    fn test_check_flags_rejects_output_variants() {
        for reserved in ["--output", "--output=app", "-o"] {
            let error = check_flags(&flags(&["--quiet", reserved])).unwrap_err();
            assert!(error.is_flag_conflict(), "{reserved} must be rejected");
        }
    }

    #[test]
    fn test_merge_flags_appends_forced_once() {
        let merged = merge_flags(&flags(&["--no-check"]));
        assert_eq!(merged, flags(&["--no-check", "--unstable", "--allow-read"]));
    }

    #[test]
    fn test_merge_flags_strips_caller_duplicates() {
        let merged = merge_flags(&flags(&["--unstable", "--no-check", "--allow-read"]));
        assert_eq!(merged, flags(&["--no-check", "--unstable", "--allow-read"]));
        assert_eq!(
            merged.iter().filter(|f| f.as_str() == "--unstable").count(),
            1
        );
    }

    #[test]
    fn test_outcome_predicates() {
        assert!(ToolOutcome::Success.is_success());
        assert!(
            ToolOutcome::SpawnFailure {
                message: "gone".to_string()
            }
            .is_spawn_failure()
        );
        assert!(
            !ToolOutcome::CompilerFailure {
                status: Some(1),
                stderr: String::new()
            }
            .is_success()
        );
    }
}
