//! Clap argument definitions for the `litq` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "litq")]
#[command(about = "Boolean query toolkit for PubMed, Europe PMC, and Cochrane searches")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared input selection: inline query text or a query file.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// The query text
    pub query: Option<String>,

    /// Read the query from a file (# comments and blank lines allowed)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
}

/// Arguments for `litq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    #[command(flatten)]
    /// Query input.
    pub input: InputArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `litq check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    /// Query input.
    pub input: InputArgs,

    /// Print nothing on success
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Arguments for `litq compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    #[command(flatten)]
    /// Query input.
    pub input: InputArgs,

    /// Target dialect: pubmed, europepmc, or cochrane
    #[arg(
        short = 'd',
        long,
        required_unless_present = "rules",
        conflicts_with = "rules"
    )]
    pub dialect: Option<String>,

    /// Load dialect syntax rules from a TOML file instead
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Supported `litq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a query and print its canonical form
    #[command(after_help = "\
QUERY SYNTAX:
  \"phrase\"           Quoted search term (single or double quotes)
  term               Single bare word
  \"term\"[MeSH]       Field term: quoted content plus a field code
  2015:2025[pdat]    Publication year range
  a AND b            Conjunction (also: und)
  a OR b             Disjunction (also: oder)
  a NOT b            Exclusion (also: nicht, kein, keine, ohne)
  (expr)             Grouping; mixing operators requires parentheses

MULTI-LINE FORMAT:
  Content lines alternate with operator lines, and every operator line
  must carry the same operator:

    \"cancer\" OR \"tumor\"
    AND
    \"treatment\"

FILES:
  # starts a comment; blank lines are ignored.

EXAMPLES:
  litq parse '\"cancer\" AND \"treatment\"'
  litq parse -f queries/coenzym_q10.txt
  litq parse --json '(\"cancer\" OR \"tumor\") AND \"treatment\"'")]
    Parse(ParseCommand),

    /// Validate a query, reporting only success or the first error
    Check(CheckCommand),

    /// Compile a query into a database dialect's surface syntax
    #[command(after_help = "\
EXAMPLES:
  litq compile -d pubmed '\"cancer\"[MeSH] AND treatment'
  litq compile -d europepmc '\"cancer\" AND (2015:2025[pdat])'
  litq compile --rules my-dialect.toml -f query.txt")]
    Compile(CompileCommand),

    /// List built-in dialects and their limits
    Dialects,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}
