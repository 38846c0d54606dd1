//! Error types for query validation and parsing.

use std::fmt;

use thiserror::Error;

/// The closed set of syntactic diagnostics the parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// End of input reached inside a quoted region.
    UnterminatedQuote,
    /// Unquoted parentheses do not match in depth and order.
    UnbalancedParens,
    /// A multi-word atom appears without surrounding quotes.
    UnquotedMultiwordTerm,
    /// Distinct operators at the same nesting level without grouping.
    MixedOperatorsNoGroup,
    /// Operator lines of a multi-line query resolve to different operators.
    MixedOperatorsMultiLine,
    /// A word in an operator slot is not in the operator lexicon.
    UnrecognizedOperator,
    /// Two operator tokens with no atom between them.
    AdjacentOperators,
    /// The token stream begins or ends with an operator.
    LeadingOrTrailingOperator,
    /// `()` or a quote pair with no content.
    EmptyAtom,
    /// A content line of a multi-line query has unbalanced parentheses.
    CrossLineParens,
    /// Even line count, or a non-operator on an operator line.
    BadMultiLineStructure,
    /// A token resembles a field term but fails the micro-grammar.
    InvalidFieldTerm,
}

impl ErrorKind {
    /// Stable identifier used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnterminatedQuote => "unterminated-quote",
            Self::UnbalancedParens => "unbalanced-parens",
            Self::UnquotedMultiwordTerm => "unquoted-multiword-term",
            Self::MixedOperatorsNoGroup => "mixed-operators-no-group",
            Self::MixedOperatorsMultiLine => "mixed-operators-multi-line",
            Self::UnrecognizedOperator => "unrecognized-operator",
            Self::AdjacentOperators => "adjacent-operators",
            Self::LeadingOrTrailingOperator => "leading-or-trailing-operator",
            Self::EmptyAtom => "empty-atom",
            Self::CrossLineParens => "cross-line-parens",
            Self::BadMultiLineStructure => "bad-multi-line-structure",
            Self::InvalidFieldTerm => "invalid-field-term",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal diagnostic for one parser invocation.
///
/// Carries a kind from the closed set and a user-directed message naming
/// the offending token or line. Messages are for end-user display; there
/// are no source offsets beyond "line N" for multi-line input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Which rule was violated.
    pub kind: ErrorKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ParseError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Prefixes the message with a 1-based line number.
    ///
    /// Used by the multi-line parser when delegating to the single-line
    /// validator, so diagnostics point at the offending physical line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.message = format!("line {line}: {}", self.message);
        self
    }

    /// Returns a generic fix-it hint for this class of error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind {
            ErrorKind::UnterminatedQuote => {
                Some("Close the phrase with the same quote character it was opened with")
            }
            ErrorKind::UnbalancedParens => {
                Some("Every opening parenthesis needs a matching closing one")
            }
            ErrorKind::UnquotedMultiwordTerm => {
                Some("Put multi-word search terms in quotes, e.g. \"lung cancer\"")
            }
            ErrorKind::MixedOperatorsNoGroup => {
                Some("Operators never bind tighter than each other; add parentheses to say what you mean")
            }
            ErrorKind::MixedOperatorsMultiLine => {
                Some("All operator lines in one query must use the same operator; use single-line format to mix them")
            }
            ErrorKind::AdjacentOperators | ErrorKind::LeadingOrTrailingOperator => {
                Some("Every operator needs a search term on both sides")
            }
            ErrorKind::InvalidFieldTerm => {
                Some("Field terms look like \"term\"[CODE], with quotes and a non-empty code")
            }
            _ => None,
        }
    }
}
