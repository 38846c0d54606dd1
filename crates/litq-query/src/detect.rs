//! Format detection.
//!
//! Classifies preprocessed input as single-line or multi-line before any
//! parsing happens. Detection is deliberately strict about what counts
//! as multi-line; everything else falls through to the single-line path,
//! where the validator produces a precise diagnostic.

use crate::op::normalize_op;

/// The two mutually exclusive input shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One logical expression, possibly spanning physical lines.
    SingleLine,
    /// Content lines alternating with operator lines.
    MultiLine,
}

impl Format {
    /// Stable identifier used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleLine => "single-line",
            Self::MultiLine => "multi-line",
        }
    }
}

/// Assigns a format tag to a non-empty sequence of logical lines.
///
/// Multi-line requires an odd count of at least three lines where every
/// odd-indexed line is exactly one recognized operator token. An even
/// count, or a non-operator word on an odd line, falls through to
/// single-line.
pub fn detect_format(lines: &[String]) -> Format {
    if lines.len() == 1 {
        return Format::SingleLine;
    }

    let odd_count = lines.len() >= 3 && lines.len() % 2 == 1;
    if odd_count && lines.iter().skip(1).step_by(2).all(|l| is_operator_line(l)) {
        return Format::MultiLine;
    }

    Format::SingleLine
}

/// True when a line consists of exactly one operator token.
pub fn is_operator_line(line: &str) -> bool {
    !line.contains(char::is_whitespace) && normalize_op(line).is_some()
}
