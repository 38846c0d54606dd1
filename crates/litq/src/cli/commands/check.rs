//! Implementation of `litq check`.

use std::process::ExitCode;

use litq_query::validate;

use super::shared::{read_query, report_parse_error};
use crate::cli::args::CheckCommand;

/// Validates the query; the exit code carries the verdict.
pub fn run(cmd: &CheckCommand) -> ExitCode {
    let raw = match read_query(&cmd.input) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    match validate(&raw) {
        Ok(()) => {
            if !cmd.quiet {
                println!("ok");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_parse_error(&err);
            ExitCode::FAILURE
        }
    }
}
