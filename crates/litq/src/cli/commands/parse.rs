//! Implementation of `litq parse`.

use std::process::ExitCode;

use litq_query::parse;
use serde::Serialize;

use super::shared::{read_query, report_parse_error};
use crate::cli::args::ParseCommand;

/// JSON shape for a successful parse.
#[derive(Serialize)]
struct ParseOutput<'a> {
    /// Detected format tag.
    format: &'a str,
    /// Canonical expression.
    canonical: &'a str,
}

/// JSON shape for a failed parse.
#[derive(Serialize)]
struct ParseFailure<'a> {
    /// Error kind identifier.
    error: &'a str,
    /// Human-readable message.
    message: &'a str,
}

/// Parses the query and prints its canonical form.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let raw = match read_query(&cmd.input) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    match parse(&raw) {
        Ok(parsed) => {
            if cmd.json {
                let output = ParseOutput {
                    format: parsed.format.as_str(),
                    canonical: &parsed.canonical,
                };
                println!("{}", to_json(&output));
            } else {
                println!("format: {}", parsed.format.as_str());
                println!("{}", parsed.canonical);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cmd.json {
                let failure = ParseFailure {
                    error: err.kind.as_str(),
                    message: &err.message,
                };
                println!("{}", to_json(&failure));
            } else {
                report_parse_error(&err);
            }
            ExitCode::FAILURE
        }
    }
}

/// Serializes an output structure to pretty JSON.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).expect("output serialization should not fail")
}
