//! Database dialect compilation for canonical boolean queries.
//!
//! Takes the canonical expressions produced by `litq-query` and rewrites
//! them into the surface syntax of a target bibliographic database.
//! Dialects are values loaded from TOML syntax-rule resources, not code:
//! rules for PubMed, Europe PMC, and the Cochrane Library ship embedded,
//! and further dialects load from disk without compiler changes.
//!
//! # Example
//!
//! ```
//! use litq_dialect::{DialectCompiler, DialectRules};
//!
//! let rules = DialectRules::builtin("europepmc").unwrap();
//! let compiler = DialectCompiler::new(rules);
//! let (out, warnings) = compiler.compile("((cancer) AND (2015:2025[pdat]))");
//! assert_eq!(out, "((cancer) AND (PUB_YEAR:(2015 TO 2025)))");
//! assert!(warnings.is_empty());
//! ```

#![warn(missing_docs)]

mod compile;
mod error;
mod rules;

pub use compile::{CompileWarning, DialectCompiler, compile_for_dialect};
pub use error::DialectError;
pub use rules::{BUILTIN_DIALECTS, DialectRules, FieldAction, Limits};
