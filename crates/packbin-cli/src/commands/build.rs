//! The `build` command: compile an entry module plus content folders into
//! one self-contained executable.

use crate::exit::ExitCode;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use packbin_pipeline::{CommandBundler, CompileOptions, ToolOutcome, compile};
use packbin_vfs::FileRegistry;
use std::path::PathBuf;
use tracing::debug;

/// Command-line inputs for one build, before merging with the manifest.
#[derive(Debug, Default)]
pub struct BuildArgs {
    /// Entry module; overrides the manifest's entry when both are given.
    pub entry: Option<PathBuf>,
    /// Optional `packbin.toml` manifest to start from.
    pub manifest: Option<PathBuf>,
    /// Additional content folders to embed.
    pub content: Vec<PathBuf>,
    /// Output executable name.
    pub output: Option<String>,
    /// Extra compiler flags.
    pub flags: Vec<String>,
    /// Runtime arguments baked into the executable.
    pub args: Vec<String>,
    /// Toolchain binary override.
    pub compiler: Option<String>,
}

/// Merges manifest and command line into final compile options.
///
/// The manifest (when given) is the base; command-line values override
/// scalars and extend lists.
fn resolve_options(args: BuildArgs) -> Result<CompileOptions> {
    let mut options = match (&args.manifest, args.entry) {
        (Some(path), entry) => {
            let mut options = CompileOptions::from_manifest(path)
                .with_context(|| format!("failed to load manifest {}", path.display()))?;
            if let Some(entry) = entry {
                options.entry_path = entry;
            }
            options
        }
        (None, Some(entry)) => CompileOptions::new(entry),
        (None, None) => bail!("an entry module or --manifest is required"),
    };

    options.content_folders.extend(args.content);
    if args.output.is_some() {
        options.output = args.output;
    }
    options.compiler_flags.extend(args.flags);
    options.runtime_args.extend(args.args);
    if let Some(command) = args.compiler {
        options.toolchain.command = command;
    }
    Ok(options)
}

/// Runs the build command.
///
/// # Errors
///
/// Returns an error for capture, bootstrap, and bundling failures.
/// Compiler failures and bad flag lists are reported on stderr and mapped
/// to non-zero exit codes instead.
pub fn run(args: BuildArgs) -> Result<ExitCode> {
    let options = resolve_options(args)?;
    debug!(entry = %options.entry_path.display(), "resolved compile options");

    let mut registry = FileRegistry::from_environment();
    let bundler = CommandBundler::from_toolchain(&options.toolchain);

    let report = match compile(&mut registry, &options, &bundler) {
        Ok(report) => report,
        Err(error) if error.is_flag_conflict() => {
            eprintln!("{} {error}", "error:".red().bold());
            eprintln!("use --output to name the executable instead");
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(error) => return Err(error.into()),
    };

    if report.skipped {
        println!(
            "{}",
            "already running as a packaged executable; nothing to build".yellow()
        );
        return Ok(ExitCode::SUCCESS);
    }

    match report.outcome {
        Some(ToolOutcome::Success) => {
            let name = report.output_name.unwrap_or_default();
            println!(
                "{} {} ({} embedded files)",
                "Compiled".green().bold(),
                name.bold(),
                report.embedded_files
            );
            Ok(ExitCode::SUCCESS)
        }
        Some(ToolOutcome::CompilerFailure { status, stderr }) => {
            let status = status.map_or_else(|| "signal".to_string(), |code| code.to_string());
            eprintln!(
                "{} compiler exited unsuccessfully (status {status})",
                "error:".red().bold()
            );
            if !stderr.is_empty() {
                eprintln!("{stderr}");
            }
            Ok(ExitCode::ERROR)
        }
        Some(ToolOutcome::SpawnFailure { message }) => {
            eprintln!("{} {message}", "error:".red().bold());
            Ok(ExitCode::ERROR)
        }
        None => Ok(ExitCode::ERROR),
    }
}
