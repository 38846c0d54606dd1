//! Helpers shared by CLI commands.

use std::{fs, process::ExitCode};

use litq_query::ParseError;

use crate::cli::args::InputArgs;

/// Resolves the raw query text from inline input or a file.
pub fn read_query(input: &InputArgs) -> Result<String, ExitCode> {
    if let Some(path) = &input.file {
        return fs::read_to_string(path).map_err(|e| {
            eprintln!("error: could not read {}: {e}", path.display());
            ExitCode::FAILURE
        });
    }

    match &input.query {
        Some(query) => Ok(query.clone()),
        // Clap's argument group guarantees one input is present.
        None => {
            eprintln!("error: no query given");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Prints a parse diagnostic with its optional hint.
pub fn report_parse_error(err: &ParseError) {
    eprintln!("error: {err}");
    if let Some(hint) = err.suggestion() {
        eprintln!("hint: {hint}");
    }
}
