//! Query tokenizer.
//!
//! Splits one logical line into lexemes while preserving quoted regions
//! and field-term atoms, then classifies them into tokens. The splitter
//! tracks two facts: whether the cursor is inside a quoted region (and
//! which quote character opened it), and whether it is inside a
//! field-code bracket region opened immediately after a matching close
//! quote. Whitespace outside both regions is a token boundary; `(` and
//! `)` outside both regions are standalone one-character tokens.
//!
//! The splitter does not validate. It produces lexemes that the
//! classifier and validator later reject; its only failure mode is an
//! unterminated quote.

use std::{iter::Peekable, str::CharIndices};

use crate::{
    error::{ErrorKind, ParseError},
    token::{QuoteStyle, Token, classify},
};

/// Splits a logical line into raw lexemes.
struct Splitter<'a> {
    /// The input line.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Splitter<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn split(mut self) -> Result<Vec<String>, ParseError> {
        let mut lexemes = Vec::new();
        let mut current = String::new();

        while let Some((_, ch)) = self.chars.next() {
            match ch {
                _ if QuoteStyle::from_char(ch).is_some() => {
                    current.push(ch);
                    self.consume_quoted(ch, &mut current)?;
                }
                '(' | ')' => {
                    flush(&mut lexemes, &mut current);
                    lexemes.push(ch.to_string());
                }
                _ if ch.is_whitespace() => flush(&mut lexemes, &mut current),
                _ => current.push(ch),
            }
        }

        flush(&mut lexemes, &mut current);
        Ok(lexemes)
    }

    /// Consumes a quoted region opened by `quote`, plus a directly
    /// attached `[`…`]` field-code region if present.
    ///
    /// Inside the quoted region only the matching close quote terminates
    /// it; whitespace, parentheses, and the other quote character are
    /// ordinary content.
    fn consume_quoted(&mut self, quote: char, current: &mut String) -> Result<(), ParseError> {
        loop {
            let Some((_, ch)) = self.chars.next() else {
                return Err(ParseError::new(
                    ErrorKind::UnterminatedQuote,
                    format!("no closing {quote} before end of input: {}", self.input),
                ));
            };
            current.push(ch);
            if ch == quote {
                break;
            }
        }

        // A field code glues onto the quoted token; without this, a
        // trailing `]` would split off as garbage after the phrase.
        if matches!(self.chars.peek(), Some((_, '['))) {
            for (_, ch) in self.chars.by_ref() {
                current.push(ch);
                if ch == ']' {
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Pushes the pending lexeme, if any.
fn flush(lexemes: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        lexemes.push(std::mem::take(current));
    }
}

/// Splits a logical line into raw lexeme strings.
///
/// Fails only on an unterminated quote.
pub fn split_lexemes(line: &str) -> Result<Vec<String>, ParseError> {
    Splitter::new(line).split()
}

/// Tokenizes a logical line: splits it and classifies every lexeme.
pub fn tokenize(line: &str) -> Result<Vec<Token>, ParseError> {
    split_lexemes(line)?.iter().map(|l| classify(l)).collect()
}
