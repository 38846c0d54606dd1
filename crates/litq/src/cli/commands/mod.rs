//! Subcommand implementations for the `litq` CLI.

pub mod check;
pub mod compile;
pub mod dialects;
pub mod parse;

mod shared;
