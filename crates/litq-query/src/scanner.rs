//! Balanced-delimiter scanner.
//!
//! Walks a string treating characters inside any quoted region (either
//! quote style) as opaque. Field-code brackets are not parentheses and
//! are not tracked here; the tokenizer keeps them inside their token, so
//! they never show up as unquoted `(`/`)`.

use std::ops::Range;

use crate::token::QuoteStyle;

/// Iterates the unquoted characters of `text` with their byte offsets.
fn unquoted_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_quote: Option<char> = None;
    text.char_indices().filter_map(move |(i, ch)| match in_quote {
        Some(q) => {
            if ch == q {
                in_quote = None;
            }
            None
        }
        None => {
            if QuoteStyle::from_char(ch).is_some() {
                in_quote = Some(ch);
                None
            } else {
                Some((i, ch))
            }
        }
    })
}

/// True iff unquoted `(` and `)` match in depth and order, never going
/// negative.
pub fn is_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    for (_, ch) in unquoted_chars(text) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Finds the first parenthesized group containing no further unquoted
/// `(`, scanning left to right.
///
/// Returns the half-open byte span covering the group including its
/// parentheses, or `None` when no unquoted `(` closes.
pub fn find_innermost_parens(text: &str) -> Option<Range<usize>> {
    let mut last_open: Option<usize> = None;
    for (i, ch) in unquoted_chars(text) {
        match ch {
            '(' => last_open = Some(i),
            ')' => {
                if let Some(start) = last_open {
                    return Some(start..i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
