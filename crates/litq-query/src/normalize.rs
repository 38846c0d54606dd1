//! Operator normalization.
//!
//! A post-pass over a canonical expression that substitutes any
//! remaining non-canonical operator spellings, including operator words
//! inside quoted content, which the dialect compiler treats
//! transparently. Substitution is whole-token only: a word is replaced
//! when it stands alone between spaces, never as a substring.

use crate::op::normalize_op;

/// Replaces non-canonical operator spellings in an expression.
pub fn normalize_operators(expr: &str) -> String {
    expr.split(' ')
        .map(|word| match normalize_op(word) {
            Some(op) if word != op.as_str() => op.as_str(),
            _ => word,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_words_replaced() {
        assert_eq!(
            normalize_operators("(Krebs) und (Behandlung)"),
            "(Krebs) AND (Behandlung)"
        );
        assert_eq!(normalize_operators("(a) ODER (b)"), "(a) OR (b)");
        assert_eq!(normalize_operators("(a) ohne (b)"), "(a) NOT (b)");
    }

    #[test]
    fn canonical_spellings_untouched() {
        let expr = "((cancer) AND (treatment))";
        assert_eq!(normalize_operators(expr), expr);
    }

    #[test]
    fn substrings_not_replaced() {
        assert_eq!(normalize_operators("(android)"), "(android)");
        assert_eq!(normalize_operators("(band) AND (ors)"), "(band) AND (ors)");
    }

    #[test]
    fn whole_words_inside_quotes_replaced() {
        // Quoted content is treated transparently so the dialect
        // compiler never sees a stray German operator.
        assert_eq!(
            normalize_operators("(\"Q10 und Ubiquinon\")"),
            "(\"Q10 AND Ubiquinon\")"
        );
    }

    #[test]
    fn attached_punctuation_blocks_replacement() {
        assert_eq!(normalize_operators("(und)"), "(und)");
    }

    #[test]
    fn idempotent() {
        let once = normalize_operators("(a) oder (b)");
        assert_eq!(normalize_operators(&once), once);
    }
}
