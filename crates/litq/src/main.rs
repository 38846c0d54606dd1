//! Command-line interface for the `litq` boolean query toolkit.

mod cli;

use std::process::ExitCode;

use cli::args::{Commands, parse_cli};

fn main() -> ExitCode {
    let cli = parse_cli();

    match cli.command {
        Commands::Parse(cmd) => cli::commands::parse::run(&cmd),
        Commands::Check(cmd) => cli::commands::check::run(&cmd),
        Commands::Compile(cmd) => cli::commands::compile::run(&cmd),
        Commands::Dialects => cli::commands::dialects::run(),
    }
}
