//! Boolean query grammar for scientific bibliographic searches.
//!
//! This crate validates and canonicalizes human-authored boolean queries
//! for databases like PubMed, Europe PMC, and Cochrane:
//!
//! - **Operators**: `AND`, `OR`, `NOT`, plus German spellings (`UND`,
//!   `ODER`, `NICHT`, `KEIN`, `KEINE`, `OHNE`)
//! - **Phrases**: `"lung cancer"` or `'Coenzym Q10'`
//! - **Field terms**: `"cancer"[MeSH]`, atomic, in both quote styles
//! - **Grouping**: explicit parentheses; operator precedence is never
//!   inferred, mixing operators at one level is an error
//! - **Two formats**: a single-line expression, or content lines
//!   alternating with operator lines
//!
//! The parser either returns a fully parenthesized canonical expression
//! or a diagnostic from a closed error set. It never evaluates,
//! executes, or semantically rewrites a query.
//!
//! # Example
//!
//! ```
//! use litq_query::parse;
//!
//! let parsed = parse("(\"cancer\" OR \"tumor\") AND \"treatment\"").unwrap();
//! assert_eq!(parsed.canonical, "(((cancer) OR (tumor)) AND (treatment))");
//! ```

#![warn(missing_docs)]

mod detect;
mod error;
mod lexer;
mod normalize;
mod op;
mod parser;
mod preprocess;
mod scanner;
mod token;

pub use detect::{Format, detect_format, is_operator_line};
pub use error::{ErrorKind, ParseError};
pub use lexer::{split_lexemes, tokenize};
pub use normalize::normalize_operators;
pub use op::{Op, normalize_op};
pub use parser::{Parsed, parse, parse_multi_line, parse_single_line, validate};
pub use preprocess::logical_lines;
pub use scanner::{find_innermost_parens, is_balanced};
pub use token::{DateRange, QuoteStyle, Token, classify, is_bare_atom, parse_date_range};
