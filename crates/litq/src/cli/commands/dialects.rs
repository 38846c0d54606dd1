//! Implementation of `litq dialects`.

use std::process::ExitCode;

use litq_dialect::{BUILTIN_DIALECTS, DialectRules};

/// Lists the built-in dialects and their validation limits.
pub fn run() -> ExitCode {
    for name in BUILTIN_DIALECTS {
        let rules = match DialectRules::builtin(name) {
            Ok(rules) => rules,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        };

        println!("{:<10} {}", rules.name, rules.description);
        if let Some(max) = rules.limits.max_query_length {
            println!("           max query length:  {max}");
        }
        if let Some(max) = rules.limits.max_nesting_depth {
            println!("           max nesting depth: {max}");
        }
        if let Some(max) = rules.limits.max_operators {
            println!("           max operators:     {max}");
        }
    }

    ExitCode::SUCCESS
}
