//! Single-line and multi-line validation and parsing.
//!
//! Parsing works by iterative parenthesis unfolding: the innermost group
//! is repeatedly replaced by a placeholder whose canonical form is kept
//! aside, until the line is flat. Flat expressions are then checked for
//! alternation (atoms at even positions, one operator kind between them)
//! and assembled into the fully parenthesized canonical form.

use crate::{
    detect::{Format, detect_format, is_operator_line},
    error::{ErrorKind, ParseError},
    lexer,
    normalize::normalize_operators,
    op::{Op, normalize_op},
    preprocess, scanner,
    token::{self, Token},
};

/// A successful parse: the detected format and the canonical expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Which input shape was detected.
    pub format: Format,
    /// Fully parenthesized canonical form.
    pub canonical: String,
}

/// Parses raw query text into its canonical form.
///
/// Runs the whole pipeline: preprocess, detect format, validate and
/// parse per format, normalize operators.
pub fn parse(input: &str) -> Result<Parsed, ParseError> {
    let lines = preprocess::logical_lines(input);
    if lines.is_empty() {
        return Err(ParseError::new(
            ErrorKind::EmptyAtom,
            "query is empty or contains only comments",
        ));
    }

    let (format, canonical) = match detect_format(&lines) {
        Format::MultiLine => (Format::MultiLine, parse_multi_line(&lines)?),
        Format::SingleLine => (Format::SingleLine, parse_single_line(&lines.join(" "))?),
    };

    Ok(Parsed {
        format,
        canonical: normalize_operators(&canonical),
    })
}

/// Validates raw query text without keeping the canonical form.
pub fn validate(input: &str) -> Result<(), ParseError> {
    parse(input).map(|_| ())
}

/// Parses one whitespace-normalized logical line into canonical form.
pub fn parse_single_line(line: &str) -> Result<String, ParseError> {
    let lexemes = lexer::split_lexemes(line)?;
    if lexemes.is_empty() {
        return Err(ParseError::new(ErrorKind::EmptyAtom, "query is empty"));
    }

    // Surface lexical problems before structural ones.
    for lexeme in &lexemes {
        token::classify(lexeme)?;
    }

    let joined = lexemes.join(" ");
    if !scanner::is_balanced(&joined) {
        return Err(ParseError::new(
            ErrorKind::UnbalancedParens,
            format!("unbalanced parentheses in: {line}"),
        ));
    }

    let mut work = joined;
    let mut slots: Vec<String> = Vec::new();

    while let Some(span) = scanner::find_innermost_parens(&work) {
        let inner = work[span.start + 1..span.end - 1].trim().to_string();
        let canonical = parse_flat(&inner, &slots, true)?;
        let idx = slots.len();
        slots.push(canonical);
        work.replace_range(span, &slot_ref(idx));
    }

    parse_flat(&work, &slots, false)
}

/// Validates and parses a multi-line query.
///
/// Content lines sit at even indices, operator lines at odd indices. All
/// operator lines must normalize to the same operator; parentheses must
/// open and close on the same content line. Assembly is top-to-bottom,
/// wrapped in one outer pair of parentheses.
pub fn parse_multi_line(lines: &[String]) -> Result<String, ParseError> {
    if lines.len() < 3 || lines.len() % 2 == 0 {
        return Err(ParseError::new(
            ErrorKind::BadMultiLineStructure,
            format!(
                "multi-line format needs an odd number of at least 3 lines, got {}",
                lines.len()
            ),
        ));
    }

    for (i, line) in lines.iter().enumerate().step_by(2) {
        if !scanner::is_balanced(line) {
            return Err(ParseError::new(
                ErrorKind::CrossLineParens,
                format!(
                    "line {}: parentheses must open and close on the same content line; use single-line format for cross-line nesting",
                    i + 1
                ),
            ));
        }
    }

    let mut ops = Vec::new();
    for (i, line) in lines.iter().enumerate().skip(1).step_by(2) {
        let op = if is_operator_line(line) {
            normalize_op(line)
        } else {
            None
        };
        match op {
            Some(op) => ops.push(op),
            None => {
                return Err(ParseError::new(
                    ErrorKind::BadMultiLineStructure,
                    format!("line {}: expected a single operator, found {line:?}", i + 1),
                ));
            }
        }
    }

    let first = ops[0];
    if let Some(other) = ops.iter().find(|op| **op != first) {
        return Err(ParseError::new(
            ErrorKind::MixedOperatorsMultiLine,
            format!(
                "operator lines mix {first} and {other}; all operator lines in one query must use the same operator"
            ),
        ));
    }

    let parts = lines
        .iter()
        .enumerate()
        .step_by(2)
        .map(|(i, line)| parse_single_line(line).map_err(|e| e.at_line(i + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("({})", parts.join(&format!(" {first} "))))
}

/// Marker character delimiting unfold placeholders. Private-use, so it
/// cannot collide with meaningful query content.
const SLOT_MARK: char = '\u{e000}';

/// Placeholder lexeme standing in for an already-parsed group.
fn slot_ref(idx: usize) -> String {
    format!("{SLOT_MARK}{idx}{SLOT_MARK}")
}

/// Recovers the slot index from a placeholder lexeme.
fn parse_slot_ref(lexeme: &str) -> Option<usize> {
    lexeme
        .strip_prefix(SLOT_MARK)?
        .strip_suffix(SLOT_MARK)?
        .parse()
        .ok()
}

/// Validates and assembles a parenthesis-free expression.
///
/// Atoms must sit at even positions with operators between them, and all
/// operators at this level must be of the same kind. Each atom becomes
/// its own parenthesized canonical fragment; the assembled chain is
/// wrapped in one pair of parentheses unless it is a single atom.
fn parse_flat(expr: &str, slots: &[String], in_group: bool) -> Result<String, ParseError> {
    let lexemes = lexer::split_lexemes(expr)?;
    if lexemes.is_empty() {
        let message = if in_group {
            "empty group () contains no search term"
        } else {
            "query is empty"
        };
        return Err(ParseError::new(ErrorKind::EmptyAtom, message));
    }

    let last = lexemes.len() - 1;
    let mut atoms: Vec<String> = Vec::new();
    let mut display: Vec<String> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();
    let mut prev_bare: Option<&str> = None;
    let mut prev_lexeme: Option<&str> = None;

    for (pos, lexeme) in lexemes.iter().enumerate() {
        let expecting_atom = pos % 2 == 0;

        if let Some(canonical) = parse_slot_ref(lexeme).and_then(|idx| slots.get(idx)) {
            if !expecting_atom {
                return Err(ParseError::new(
                    ErrorKind::UnquotedMultiwordTerm,
                    format!("expected an operator before {canonical}"),
                ));
            }
            atoms.push(canonical.clone());
            display.push(canonical.clone());
            prev_bare = None;
            prev_lexeme = Some(lexeme.as_str());
            continue;
        }

        let tok = token::classify(lexeme)?;
        match tok {
            Token::Operator(op) => {
                if expecting_atom {
                    return Err(if pos == 0 {
                        ParseError::new(
                            ErrorKind::LeadingOrTrailingOperator,
                            format!("expression begins with operator {lexeme}"),
                        )
                    } else {
                        ParseError::new(
                            ErrorKind::AdjacentOperators,
                            format!(
                                "adjacent operators {} {lexeme} with no search term between them",
                                prev_lexeme.unwrap_or_default()
                            ),
                        )
                    });
                }
                if pos == last {
                    return Err(ParseError::new(
                        ErrorKind::LeadingOrTrailingOperator,
                        format!("expression ends with operator {lexeme}"),
                    ));
                }
                ops.push(op);
                prev_bare = None;
            }
            _ if !expecting_atom => {
                return Err(operator_slot_error(&tok, lexeme, prev_bare));
            }
            Token::QuotedPhrase { content, quote } => {
                atoms.push(canonical_phrase(&content, quote));
                display.push(lexeme.clone());
                prev_bare = None;
            }
            Token::FieldTerm { .. } => {
                atoms.push(format!("({lexeme})"));
                display.push(lexeme.clone());
                prev_bare = None;
            }
            Token::BareWord(word) => {
                if !token::is_bare_atom(&word) {
                    return Err(bare_atom_error(&word));
                }
                atoms.push(format!("({word})"));
                display.push(lexeme.clone());
                prev_bare = Some(lexeme.as_str());
            }
            Token::LeftParen | Token::RightParen => {
                unreachable!("parentheses are unfolded before flat parsing")
            }
        }
        prev_lexeme = Some(lexeme.as_str());
    }

    check_single_operator_kind(&ops, &display)?;

    if atoms.len() == 1 {
        return Ok(atoms.swap_remove(0));
    }
    let op = ops[0];
    Ok(format!("({})", atoms.join(&format!(" {op} "))))
}

/// Error for a non-operator token occupying an operator slot.
fn operator_slot_error(tok: &Token, lexeme: &str, prev_bare: Option<&str>) -> ParseError {
    match tok {
        Token::BareWord(word) => {
            if let Some(prev) = prev_bare {
                ParseError::new(
                    ErrorKind::UnquotedMultiwordTerm,
                    format!("unquoted multi-word term: try \"{prev} {word}\""),
                )
            } else {
                ParseError::new(
                    ErrorKind::UnrecognizedOperator,
                    format!("{word} is not an operator (expected AND, OR, or NOT)"),
                )
            }
        }
        _ => ParseError::new(
            ErrorKind::UnquotedMultiwordTerm,
            format!("expected an operator before {lexeme}"),
        ),
    }
}

/// Error for a bare token that is not an acceptable unquoted atom.
fn bare_atom_error(word: &str) -> ParseError {
    if word.contains('[') || word.contains(']') {
        ParseError::new(
            ErrorKind::InvalidFieldTerm,
            format!("{word} is not a valid field term; quote the content, e.g. \"term\"[CODE]"),
        )
    } else {
        ParseError::new(
            ErrorKind::UnquotedMultiwordTerm,
            format!("term {word} contains characters that require quoting"),
        )
    }
}

/// Rejects distinct operator kinds at one nesting level, suggesting a
/// parenthesized rewrite of the offending expression.
fn check_single_operator_kind(ops: &[Op], display: &[String]) -> Result<(), ParseError> {
    let Some(&first) = ops.first() else {
        return Ok(());
    };
    let Some(split) = ops.iter().position(|op| *op != first) else {
        return Ok(());
    };
    let other = ops[split];

    // Group everything left of the first differing operator.
    let mut left = display[0].clone();
    for i in 1..=split {
        left.push_str(&format!(" {} {}", ops[i - 1], display[i]));
    }
    let mut right = display[split + 1].clone();
    for i in split + 2..display.len() {
        right.push_str(&format!(" {} {}", ops[i - 1], display[i]));
    }

    Err(ParseError::new(
        ErrorKind::MixedOperatorsNoGroup,
        format!(
            "mixed operators {first} and {other} at the same level without parentheses; group explicitly, e.g. ({left}) {other} {right}"
        ),
    ))
}

/// Canonical fragment for a quoted phrase.
///
/// Quotes are dropped only when the content stands on its own as a bare
/// atom; multi-word content and operator spellings keep their quotes so
/// the canonical form re-validates unchanged.
fn canonical_phrase(content: &str, quote: token::QuoteStyle) -> String {
    if token::is_bare_atom(content) && normalize_op(content).is_none() {
        format!("({content})")
    } else {
        let q = quote.as_char();
        format!("({q}{content}{q})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(input: &str) -> String {
        parse(input).unwrap().canonical
    }

    fn error_kind(input: &str) -> ErrorKind {
        parse(input).unwrap_err().kind
    }

    #[test]
    fn single_quoted_atom() {
        assert_eq!(canonical("\"cancer\""), "(cancer)");
    }

    #[test]
    fn single_bare_atom() {
        assert_eq!(canonical("cancer"), "(cancer)");
    }

    #[test]
    fn multiword_phrase_keeps_quotes() {
        assert_eq!(canonical("\"Coenzym Q10\""), "(\"Coenzym Q10\")");
    }

    #[test]
    fn single_quote_style_preserved() {
        assert_eq!(canonical("'Coenzym Q10'"), "('Coenzym Q10')");
    }

    #[test]
    fn operator_spelling_in_quotes_keeps_quotes() {
        assert_eq!(canonical("\"and\""), "(\"and\")");
    }

    #[test]
    fn simple_and() {
        assert_eq!(
            canonical("\"cancer\" AND \"treatment\""),
            "((cancer) AND (treatment))"
        );
    }

    #[test]
    fn grouped_or_then_and() {
        assert_eq!(
            canonical("(\"cancer\" OR \"tumor\") AND \"treatment\""),
            "(((cancer) OR (tumor)) AND (treatment))"
        );
    }

    #[test]
    fn flat_chain_single_wrap() {
        assert_eq!(
            canonical("\"a\" AND \"b\" AND \"c\""),
            "((a) AND (b) AND (c))"
        );
    }

    #[test]
    fn field_term_atom_verbatim() {
        assert_eq!(
            canonical("\"cancer\"[MeSH] AND treatment"),
            "((\"cancer\"[MeSH]) AND (treatment))"
        );
    }

    #[test]
    fn date_range_atom() {
        assert_eq!(
            canonical("\"cancer\" AND (2015:2025[pdat])"),
            "((cancer) AND (2015:2025[pdat]))"
        );
    }

    #[test]
    fn german_operators_normalized() {
        assert_eq!(
            canonical("\"Krebs\" UND \"Behandlung\""),
            "((Krebs) AND (Behandlung))"
        );
        assert_eq!(canonical("\"Krebs\" ODER \"Tumor\""), "((Krebs) OR (Tumor))");
        assert_eq!(canonical("\"Krebs\" ohne \"Tier\""), "((Krebs) NOT (Tier))");
    }

    #[test]
    fn binary_not() {
        assert_eq!(
            canonical("\"cancer\" NOT \"animal\""),
            "((cancer) NOT (animal))"
        );
    }

    #[test]
    fn redundant_nesting_collapses() {
        assert_eq!(canonical("((\"cancer\"))"), "(cancer)");
    }

    #[test]
    fn deeper_nesting() {
        assert_eq!(
            canonical("((\"a\" OR \"b\") AND \"c\") OR \"d\""),
            "((((a) OR (b)) AND (c)) OR (d))"
        );
    }

    #[test]
    fn whitespace_normalized_outside_quotes() {
        assert_eq!(
            canonical("  \"cancer\"    AND   \"treatment\" "),
            "((cancer) AND (treatment))"
        );
    }

    #[test]
    fn mixed_operators_rejected() {
        assert_eq!(
            error_kind("\"cancer\" OR \"tumor\" AND \"treatment\""),
            ErrorKind::MixedOperatorsNoGroup
        );
    }

    #[test]
    fn mixed_operators_message_suggests_grouping() {
        let err = parse("\"cancer\" OR \"tumor\" AND \"treatment\"").unwrap_err();
        assert!(err.message.contains("OR"));
        assert!(err.message.contains("AND"));
        assert!(
            err.message
                .contains("(\"cancer\" OR \"tumor\") AND \"treatment\"")
        );
    }

    #[test]
    fn mixed_operators_grouped_ok() {
        assert_eq!(
            canonical("(\"cancer\" OR \"tumor\") AND \"treatment\""),
            "(((cancer) OR (tumor)) AND (treatment))"
        );
    }

    #[test]
    fn mixed_operators_inside_group_rejected() {
        assert_eq!(
            error_kind("(\"a\" AND \"b\" OR \"c\") AND \"d\""),
            ErrorKind::MixedOperatorsNoGroup
        );
    }

    #[test]
    fn leading_operator_rejected() {
        assert_eq!(error_kind("AND \"cancer\""), ErrorKind::LeadingOrTrailingOperator);
    }

    #[test]
    fn trailing_operator_rejected() {
        assert_eq!(error_kind("\"cancer\" AND"), ErrorKind::LeadingOrTrailingOperator);
    }

    #[test]
    fn adjacent_operators_rejected() {
        assert_eq!(
            error_kind("\"cancer\" AND AND \"treatment\""),
            ErrorKind::AdjacentOperators
        );
    }

    #[test]
    fn unquoted_multiword_rejected() {
        let err = parse("Coenzym Q10").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnquotedMultiwordTerm);
        assert!(err.message.contains("\"Coenzym Q10\""));
    }

    #[test]
    fn word_in_operator_slot_rejected() {
        assert_eq!(
            error_kind("\"cancer\" maybe \"treatment\""),
            ErrorKind::UnrecognizedOperator
        );
    }

    #[test]
    fn adjacent_phrases_rejected() {
        assert_eq!(
            error_kind("\"cancer\" \"treatment\""),
            ErrorKind::UnquotedMultiwordTerm
        );
    }

    #[test]
    fn unbalanced_parens_rejected() {
        assert_eq!(error_kind("(\"cancer\" AND \"tumor\""), ErrorKind::UnbalancedParens);
        assert_eq!(error_kind("\"cancer\")"), ErrorKind::UnbalancedParens);
    }

    #[test]
    fn empty_group_rejected() {
        assert_eq!(error_kind("\"cancer\" AND ()"), ErrorKind::EmptyAtom);
    }

    #[test]
    fn empty_quotes_rejected() {
        assert_eq!(error_kind("\"\""), ErrorKind::EmptyAtom);
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(error_kind(""), ErrorKind::EmptyAtom);
        assert_eq!(error_kind("# only comments"), ErrorKind::EmptyAtom);
    }

    #[test]
    fn unterminated_quote_rejected() {
        assert_eq!(error_kind("\"cancer AND tumor"), ErrorKind::UnterminatedQuote);
    }

    #[test]
    fn unquoted_field_term_rejected() {
        assert_eq!(error_kind("cancer[MeSH]"), ErrorKind::InvalidFieldTerm);
    }

    #[test]
    fn multi_line_three_lines() {
        let parsed = parse("\"cancer\"\nAND\n\"treatment\"").unwrap();
        assert_eq!(parsed.format, Format::MultiLine);
        assert_eq!(parsed.canonical, "((cancer) AND (treatment))");
    }

    #[test]
    fn multi_line_five_lines_flat() {
        let parsed = parse("\"a\"\nAND\n\"b\"\nAND\n\"c\"").unwrap();
        assert_eq!(parsed.canonical, "((a) AND (b) AND (c))");
    }

    #[test]
    fn multi_line_content_lines_parse_independently() {
        let parsed = parse("\"cancer\" OR \"tumor\"\nAND\n\"treatment\" OR \"therapy\"").unwrap();
        assert_eq!(
            parsed.canonical,
            "(((cancer) OR (tumor)) AND ((treatment) OR (therapy)))"
        );
    }

    #[test]
    fn multi_line_german_operator() {
        let parsed = parse("\"Krebs\"\nUND\n\"Behandlung\"").unwrap();
        assert_eq!(parsed.format, Format::MultiLine);
        assert_eq!(parsed.canonical, "((Krebs) AND (Behandlung))");
    }

    #[test]
    fn multi_line_mixed_operators_rejected() {
        let err = parse("\"cancer\"\nOR\n\"tumor\"\nAND\n\"treatment\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MixedOperatorsMultiLine);
        assert!(err.message.contains("OR"));
        assert!(err.message.contains("AND"));
    }

    #[test]
    fn multi_line_cross_line_parens_rejected() {
        let lines: Vec<String> = ["(\"cancer\"", "AND", "\"treatment\")"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = parse_multi_line(&lines).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CrossLineParens);
        assert!(err.message.contains("line 1"));
    }

    #[test]
    fn multi_line_structure_errors_direct() {
        let two: Vec<String> = ["\"a\"", "AND"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            parse_multi_line(&two).unwrap_err().kind,
            ErrorKind::BadMultiLineStructure
        );

        let bad_op: Vec<String> = ["\"a\"", "MAYBE", "\"b\""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            parse_multi_line(&bad_op).unwrap_err().kind,
            ErrorKind::BadMultiLineStructure
        );
    }

    #[test]
    fn even_line_count_routes_to_single_line() {
        // Detection falls through; the single-line validator reports the
        // trailing operator precisely.
        let err = parse("\"cancer\"\nAND").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LeadingOrTrailingOperator);
    }

    #[test]
    fn multi_physical_line_single_query_joined() {
        let parsed = parse("(\"cancer\" OR\n\"tumor\") AND\n\"treatment\"").unwrap();
        assert_eq!(parsed.format, Format::SingleLine);
        assert_eq!(
            parsed.canonical,
            "(((cancer) OR (tumor)) AND (treatment))"
        );
    }

    #[test]
    fn multi_line_error_names_the_line() {
        let err = parse("\"cancer\"\nAND\n\"a\" maybe \"b\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnrecognizedOperator);
        assert!(err.message.starts_with("line 3:"));
    }

    #[test]
    fn comments_stripped_before_parsing() {
        let parsed = parse("\"cancer\" # main term\nAND\n\"treatment\" # intervention").unwrap();
        assert_eq!(parsed.format, Format::MultiLine);
        assert_eq!(parsed.canonical, "((cancer) AND (treatment))");
    }

    #[test]
    fn canonical_round_trips() {
        let inputs = [
            "\"cancer\"",
            "\"Coenzym Q10\"",
            "\"cancer\" AND \"treatment\"",
            "(\"cancer\" OR \"tumor\") AND \"treatment\"",
            "\"cancer\"[MeSH] AND treatment",
            "\"a\"\nAND\n\"b\"\nAND\n\"c\"",
            "\"cancer\" AND (2015:2025[pdat])",
        ];
        for input in inputs {
            let first = parse(input).unwrap().canonical;
            let second = parse(&first).unwrap();
            assert_eq!(second.canonical, first, "not idempotent for {input}");
            assert_eq!(second.format, Format::SingleLine);
        }
    }

    #[test]
    fn canonical_is_balanced() {
        let canon = canonical("((\"a\" OR \"b\") AND \"c\") OR \"d\"");
        assert!(scanner::is_balanced(&canon));
    }
}
