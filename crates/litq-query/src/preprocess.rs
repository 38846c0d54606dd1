//! Input preprocessor.
//!
//! Turns raw user text into the logical-line sequence the parser
//! consumes: splits on line terminators, strips `#` comments, trims, and
//! discards empty lines. A `#` inside a quoted region or inside
//! field-code brackets is content, not a comment.

/// Produces the logical lines of a raw query.
pub fn logical_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(|line| strip_inline_comment(line).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cuts a line at the first `#` that sits outside quotes and brackets.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut bracket_depth: usize = 0;

    for (i, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '[' if !in_single && !in_double => bracket_depth += 1,
            ']' if !in_single && !in_double => bracket_depth = bracket_depth.saturating_sub(1),
            '#' if !in_single && !in_double && bracket_depth == 0 => return &line[..i],
            _ => {}
        }
    }

    line
}
