//! `keg completions <shell>` – generate completions for keg itself.

use crate::cli::Cli;
use clap::CommandFactory;

pub fn run_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "keg", &mut std::io::stdout());
}
