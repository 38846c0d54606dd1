//! Token classification.
//!
//! Classifies a single lexeme (already split from surrounding whitespace)
//! into one of the five token kinds. Classification order defines
//! precedence of interpretation: grouping delimiters, then operators,
//! then field terms, then quoted phrases, then bare words. The field-term
//! check runs before the quoted-phrase check so that a trailing `[CODE]`
//! is never misread as garbage after a phrase.

use crate::{
    error::{ErrorKind, ParseError},
    op::{Op, normalize_op},
};

/// Which quote character delimits a phrase or field-term content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// ASCII double quote (`"`).
    Double,
    /// ASCII single quote (`'`).
    Single,
}

impl QuoteStyle {
    /// The delimiter character.
    pub fn as_char(&self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }

    /// Recognizes a quote character.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            _ => None,
        }
    }
}

/// One atomic parse unit within a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A boolean operator.
    Operator(Op),

    /// A quoted phrase without a field code. Content is verbatim.
    QuotedPhrase {
        /// Text between the quotes.
        content: String,
        /// Which quote character delimited it.
        quote: QuoteStyle,
    },

    /// An atomic `"content"[CODE]` field term.
    FieldTerm {
        /// Text between the quotes, not parsed further.
        content: String,
        /// Which quote character delimited it.
        quote: QuoteStyle,
        /// The bracketed field code.
        code: String,
    },

    /// `(`
    LeftParen,

    /// `)`
    RightParen,

    /// An unquoted word.
    BareWord(String),
}

impl Token {
    /// True for tokens that can stand in an atom position.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Self::QuotedPhrase { .. } | Self::FieldTerm { .. } | Self::BareWord(_)
        )
    }
}

/// Classifies a lexeme into a token.
///
/// Fails when the lexeme starts a quoted construct that violates the
/// field-term micro-grammar or is empty (`""`).
pub fn classify(lexeme: &str) -> Result<Token, ParseError> {
    match lexeme {
        "(" => return Ok(Token::LeftParen),
        ")" => return Ok(Token::RightParen),
        _ => {}
    }

    if let Some(op) = normalize_op(lexeme) {
        return Ok(Token::Operator(op));
    }

    if let Some(quote) = lexeme.chars().next().and_then(QuoteStyle::from_char) {
        return classify_quoted(lexeme, quote);
    }

    Ok(Token::BareWord(lexeme.to_string()))
}

/// Classifies a lexeme that starts with a quote character.
fn classify_quoted(lexeme: &str, quote: QuoteStyle) -> Result<Token, ParseError> {
    let q = quote.as_char();
    let after_open = &lexeme[q.len_utf8()..];

    let Some(close) = after_open.find(q) else {
        return Err(ParseError::new(
            ErrorKind::UnterminatedQuote,
            format!("no closing {q} in {lexeme}"),
        ));
    };

    let content = &after_open[..close];
    let rest = &after_open[close + q.len_utf8()..];

    if rest.is_empty() {
        if content.is_empty() {
            return Err(ParseError::new(
                ErrorKind::EmptyAtom,
                format!("empty quotes {q}{q} contain no search term"),
            ));
        }
        return Ok(Token::QuotedPhrase {
            content: content.to_string(),
            quote,
        });
    }

    // Anything after the closing quote must be exactly one [CODE] span.
    let code = parse_field_code(lexeme, rest)?;
    if content.is_empty() {
        return Err(ParseError::new(
            ErrorKind::InvalidFieldTerm,
            format!("field term {lexeme} has no quoted content"),
        ));
    }

    Ok(Token::FieldTerm {
        content: content.to_string(),
        quote,
        code,
    })
}

/// Validates the `[CODE]` tail of a field term.
fn parse_field_code(lexeme: &str, rest: &str) -> Result<String, ParseError> {
    let invalid = |message: String| Err(ParseError::new(ErrorKind::InvalidFieldTerm, message));

    let Some(bracketed) = rest.strip_prefix('[') else {
        return invalid(format!(
            "unexpected {rest:?} after closing quote in {lexeme}"
        ));
    };
    let Some(close) = bracketed.find(']') else {
        return invalid(format!("missing ] after field code in {lexeme}"));
    };

    let code = &bracketed[..close];
    let trailing = &bracketed[close + 1..];

    if !trailing.is_empty() {
        return invalid(format!(
            "unexpected {trailing:?} after field code in {lexeme}"
        ));
    }
    if code.is_empty() {
        return invalid(format!("empty field code [] in {lexeme}"));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return invalid(format!(
            "field code [{code}] may contain only letters, digits, and underscores"
        ));
    }

    Ok(code.to_string())
}

/// True when `text` is acceptable as an unquoted atom.
///
/// A bare atom is a single word (`\w` start, then word characters, dots,
/// or hyphens) or a publication-year range like `2015:2025`, optionally
/// tagged with a field code (`2015:2025[pdat]`).
pub fn is_bare_atom(text: &str) -> bool {
    is_plain_word(text) || parse_date_range(text).is_some()
}

/// Single-word check: `\w[\w.\-]*`.
fn is_plain_word(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphanumeric() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Components of an unquoted publication-year range atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange<'a> {
    /// Lower bound year (four digits).
    pub lower: &'a str,
    /// Upper bound year (four digits).
    pub upper: &'a str,
    /// Field code, if the range carries a `[CODE]` tag.
    pub code: Option<&'a str>,
}

/// Parses a `YYYY:YYYY` or `YYYY:YYYY[CODE]` atom.
pub fn parse_date_range(text: &str) -> Option<DateRange<'_>> {
    let (range, tag) = match text.find('[') {
        Some(i) => (&text[..i], Some(&text[i..])),
        None => (text, None),
    };

    let (lower, upper) = range.split_once(':')?;
    if !is_four_digit_year(lower) || !is_four_digit_year(upper) {
        return None;
    }

    let code = match tag {
        None => None,
        Some(tag) => {
            let inner = tag.strip_prefix('[')?.strip_suffix(']')?;
            if inner.is_empty()
                || !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return None;
            }
            Some(inner)
        }
    };

    Some(DateRange { lower, upper, code })
}

/// Exactly four ASCII digits.
fn is_four_digit_year(text: &str) -> bool {
    text.len() == 4 && text.chars().all(|c| c.is_ascii_digit())
}
