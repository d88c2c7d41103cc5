//! Shell completions command implementation.

use crate::cli::{Cli, Shell};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells, Generator};
use std::io;

const BIN_NAME: &str = "kishop";

/// Generate shell completions for the specified shell.
pub fn execute(shell: &Shell) -> Result<()> {
    match shell {
        Shell::Bash => write_completions(shells::Bash),
        Shell::Zsh => write_completions(shells::Zsh),
        Shell::Fish => write_completions(shells::Fish),
        Shell::PowerShell => write_completions(shells::PowerShell),
        Shell::Elvish => write_completions(shells::Elvish),
    }
    Ok(())
}

fn write_completions(generator: impl Generator) {
    let mut cmd = Cli::command();
    generate(generator, &mut cmd, BIN_NAME, &mut io::stdout());
}
