//! Shell completion generation command.

use crate::exit::ExitCode;
use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;

/// Generates a completion script for the given shell on stdout.
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Runs the completions command.
///
/// # Errors
///
/// Infallible in practice; kept as `Result` for consistency with the
/// other commands.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("generating {shell} completions");
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_completions_does_not_panic() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut cmd = Command::new("packbin");
            generate_completions(shell, &mut cmd);
        }
    }

    #[test]
    fn test_run_reports_success() {
        let mut cmd = Command::new("packbin");
        let code = run(Shell::Bash, &mut cmd).unwrap();
        assert!(code.is_success());
    }
}
