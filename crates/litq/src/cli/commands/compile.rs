//! Implementation of `litq compile`.

use std::process::ExitCode;

use litq_dialect::{DialectCompiler, DialectRules};
use litq_query::parse;
use serde::Serialize;

use super::shared::{read_query, report_parse_error};
use crate::cli::args::CompileCommand;

/// JSON shape for a compilation result.
#[derive(Serialize)]
struct CompileOutput<'a> {
    /// Dialect name from the rule set.
    dialect: &'a str,
    /// Canonical form before dialect rewriting.
    canonical: &'a str,
    /// Compiled surface form.
    compiled: &'a str,
    /// Non-fatal warnings.
    warnings: Vec<String>,
}

/// Parses the query and compiles it for the requested dialect.
pub fn run(cmd: &CompileCommand) -> ExitCode {
    let raw = match read_query(&cmd.input) {
        Ok(raw) => raw,
        Err(code) => return code,
    };

    let rules = match load_rules(cmd) {
        Ok(rules) => rules,
        Err(code) => return code,
    };

    let parsed = match parse(&raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            report_parse_error(&err);
            return ExitCode::FAILURE;
        }
    };

    let compiler = DialectCompiler::new(rules);
    let (compiled, warnings) = compiler.compile(&parsed.canonical);

    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    if cmd.json {
        let output = CompileOutput {
            dialect: &compiler.rules().name,
            canonical: &parsed.canonical,
            compiled: &compiled,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("output serialization should not fail")
        );
    } else {
        println!("{compiled}");
    }

    ExitCode::SUCCESS
}

/// Loads the rule set named by `--dialect` or `--rules`.
fn load_rules(cmd: &CompileCommand) -> Result<DialectRules, ExitCode> {
    let loaded = match (&cmd.rules, &cmd.dialect) {
        (Some(path), _) => DialectRules::load(path),
        (None, Some(name)) => DialectRules::builtin(name),
        // Clap requires one of the two.
        (None, None) => {
            eprintln!("error: no dialect given");
            return Err(ExitCode::FAILURE);
        }
    };

    loaded.map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::FAILURE
    })
}
