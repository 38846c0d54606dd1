//! Error types for dialect rule loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading syntax-rule resources.
#[derive(Debug, Error)]
pub enum DialectError {
    /// Failed to read a syntax-rule file.
    #[error("failed to read syntax rules {path}: {source}")]
    ReadRules {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse a syntax-rule document.
    #[error("failed to parse syntax rules from {origin}: {source}")]
    ParseRules {
        /// Where the document came from (path or built-in name).
        origin: String,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// The requested dialect has no built-in rule resource.
    #[error("unknown dialect '{name}' (built-ins: pubmed, europepmc, cochrane)")]
    UnknownDialect {
        /// The requested name.
        name: String,
    },

    /// A date-range template does not reference both bounds.
    #[error("date range template {template:?} must reference {{lower}} and {{upper}}")]
    BadTemplate {
        /// The offending template.
        template: String,
    },
}
