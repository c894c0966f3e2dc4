//! packbin - package programs and their assets into one executable.
//!
//! The CLI is organized around subcommands:
//! - `build` - Compile an entry module plus content folders into a
//!   self-contained executable
//! - `snapshot` - Print the encoded file snapshot for a set of folders
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Compile main.ts and everything under assets/ into ./main
//! packbin build main.ts --content assets
//!
//! # Same build driven by a manifest, with an extra flag
//! packbin build --manifest packbin.toml --flag=--no-check
//! ```

#![deny(unsafe_code)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod exit;

use commands::build::BuildArgs;

/// packbin - single-executable packaging for programs and their assets.
#[derive(Parser, Debug)]
#[command(name = "packbin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an entry module into a self-contained executable.
    ///
    /// Walks the given content folders, embeds every file alongside the
    /// bundled program, and invokes the external toolchain to produce a
    /// native executable.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Derive the output name from the entry file
    /// packbin build main.ts --content assets --content static
    ///
    /// # Explicit output name plus baked-in runtime arguments
    /// packbin build main.ts --content assets --output app --arg=--serve
    /// ```
    Build {
        /// Entry-point module (required unless --manifest provides one)
        #[arg(required_unless_present = "manifest")]
        entry: Option<PathBuf>,

        /// Load options from a packbin.toml manifest; other flags
        /// override its values
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Content folder to embed (repeatable)
        #[arg(short, long = "content", num_args = 1)]
        content: Vec<PathBuf>,

        /// Output executable name (default: entry file stem)
        #[arg(short, long)]
        output: Option<String>,

        /// Extra compiler flag (repeatable; use --flag=VALUE for values
        /// starting with -)
        #[arg(long = "flag", num_args = 1)]
        flags: Vec<String>,

        /// Runtime argument baked into the executable (repeatable)
        #[arg(long = "arg", num_args = 1)]
        args: Vec<String>,

        /// Toolchain binary to invoke
        #[arg(long, env = "PACKBIN_COMPILER")]
        compiler: Option<String>,
    },

    /// Print the encoded file snapshot for a set of folders.
    ///
    /// Produces on stdout exactly the literal a build would embed in the
    /// bootstrap prologue.
    Snapshot {
        /// Folders to capture
        #[arg(required = true, num_args = 1..)]
        folders: Vec<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let exit_code = execute_command(cli.command)?;
    std::process::exit(exit_code.as_i32());
}

/// Initializes tracing on stderr, honoring `RUST_LOG` unless --verbose
/// forces debug level.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes commands to their handlers and returns an exit code.
fn execute_command(command: Commands) -> Result<exit::ExitCode> {
    match command {
        Commands::Build {
            entry,
            manifest,
            content,
            output,
            flags,
            args,
            compiler,
        } => commands::build::run(BuildArgs {
            entry,
            manifest,
            content,
            output,
            flags,
            args,
            compiler,
        }),
        Commands::Snapshot { folders } => commands::snapshot::run(&folders),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
