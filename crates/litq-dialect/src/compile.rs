//! Canonical-form rewriter.
//!
//! Compiles a canonical expression into one database's surface syntax by
//! local token rewrites; the expression is never re-parsed. Parentheses,
//! operators, and plain atoms pass through; field terms and tagged year
//! ranges are rewritten per the dialect's rules. Non-fatal findings go
//! to a warning channel alongside the compiled string.

use std::{fmt, iter::Peekable, str::CharIndices};

use litq_query::{QuoteStyle, Token, classify, parse_date_range};

use crate::rules::{DialectRules, FieldAction};

/// A non-fatal finding during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileWarning {
    /// A field code the dialect does not know; passed through unchanged.
    UnknownFieldCode {
        /// The unrecognized code.
        code: String,
    },
    /// The compiled query exceeds the dialect's length bound.
    QueryTooLong {
        /// Compiled length in characters.
        length: usize,
        /// Dialect bound.
        max: usize,
    },
    /// The query nests deeper than the dialect's bound.
    NestingTooDeep {
        /// Observed maximum depth.
        depth: usize,
        /// Dialect bound.
        max: usize,
    },
    /// The query uses more operators than the dialect's bound.
    TooManyOperators {
        /// Observed operator count.
        count: usize,
        /// Dialect bound.
        max: usize,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFieldCode { code } => {
                write!(f, "unknown field code [{code}] passed through unchanged")
            }
            Self::QueryTooLong { length, max } => {
                write!(
                    f,
                    "compiled query is {length} characters, over the dialect limit of {max}"
                )
            }
            Self::NestingTooDeep { depth, max } => {
                write!(
                    f,
                    "query nests {depth} levels deep, over the dialect limit of {max}"
                )
            }
            Self::TooManyOperators { count, max } => {
                write!(
                    f,
                    "query uses {count} operators, over the dialect limit of {max}"
                )
            }
        }
    }
}

/// Fallback action for unknown codes after the warning is recorded.
const PASS: FieldAction = FieldAction::Pass;

/// Compiles canonical expressions for one dialect.
///
/// Holds its rule set immutably; one compiler can serve any number of
/// compilations from any number of threads.
pub struct DialectCompiler {
    /// The dialect's syntax rules.
    rules: DialectRules,
}

impl DialectCompiler {
    /// Creates a compiler from a loaded rule set.
    pub fn new(rules: DialectRules) -> Self {
        Self { rules }
    }

    /// The rule set this compiler was built with.
    pub fn rules(&self) -> &DialectRules {
        &self.rules
    }

    /// Rewrites a canonical expression into the dialect's surface form.
    ///
    /// Always succeeds; findings that would not stop the target database
    /// from accepting the query are returned as warnings.
    pub fn compile(&self, canonical: &str) -> (String, Vec<CompileWarning>) {
        let mut out = String::with_capacity(canonical.len());
        let mut warnings = Vec::new();
        let mut depth: usize = 0;
        let mut max_depth: usize = 0;
        let mut operator_count: usize = 0;

        let mut iter = canonical.char_indices().peekable();
        while let Some(&(start, ch)) = iter.peek() {
            match ch {
                '(' => {
                    iter.next();
                    depth += 1;
                    max_depth = max_depth.max(depth);
                    out.push('(');
                }
                ')' => {
                    iter.next();
                    depth = depth.saturating_sub(1);
                    out.push(')');
                }
                c if c.is_whitespace() => {
                    iter.next();
                    out.push(c);
                }
                _ => {
                    let lexeme = take_lexeme(canonical, &mut iter, start);
                    out.push_str(&self.rewrite(lexeme, &mut operator_count, &mut warnings));
                }
            }
        }

        self.check_limits(&out, max_depth, operator_count, &mut warnings);
        (out, warnings)
    }

    /// Rewrites one lexeme of the canonical form.
    fn rewrite(
        &self,
        lexeme: &str,
        operator_count: &mut usize,
        warnings: &mut Vec<CompileWarning>,
    ) -> String {
        match classify(lexeme) {
            Ok(Token::Operator(op)) => {
                *operator_count += 1;
                self.rules
                    .operator_surface(op.as_str())
                    .unwrap_or(op.as_str())
                    .to_string()
            }
            Ok(Token::FieldTerm {
                content,
                quote,
                code,
            }) => self.rewrite_field_term(lexeme, &content, quote, &code, warnings),
            Ok(Token::BareWord(word)) => self.rewrite_bare_word(&word),
            Ok(_) | Err(_) => lexeme.to_string(),
        }
    }

    /// Rewrites a `"term"[CODE]` atom.
    fn rewrite_field_term(
        &self,
        lexeme: &str,
        content: &str,
        quote: QuoteStyle,
        code: &str,
        warnings: &mut Vec<CompileWarning>,
    ) -> String {
        // A quoted year range tagged with the date code renders through
        // the range template, like its unquoted form.
        if code.eq_ignore_ascii_case(&self.rules.date_code)
            && let Some(range) = parse_date_range(content)
            && range.code.is_none()
            && let Some(rendered) = self.rules.render_date_range(range.lower, range.upper)
        {
            return rendered;
        }

        let action = match self.rules.action_for(code) {
            Some(action) => action,
            None => match self.rules.default_action() {
                Some(action) => action,
                None => {
                    warnings.push(CompileWarning::UnknownFieldCode {
                        code: code.to_string(),
                    });
                    &PASS
                }
            },
        };

        let q = quote.as_char();
        match action {
            FieldAction::Pass => lexeme.to_string(),
            FieldAction::Strip => format!("{q}{content}{q}"),
            FieldAction::Rename(surface) => format!("{surface}:{q}{content}{q}"),
        }
    }

    /// Rewrites a bare atom; only tagged year ranges change.
    fn rewrite_bare_word(&self, word: &str) -> String {
        if let Some(range) = parse_date_range(word)
            && let Some(code) = range.code
            && code.eq_ignore_ascii_case(&self.rules.date_code)
            && let Some(rendered) = self.rules.render_date_range(range.lower, range.upper)
        {
            return rendered;
        }
        word.to_string()
    }

    /// Emits warnings for exceeded dialect bounds.
    fn check_limits(
        &self,
        compiled: &str,
        max_depth: usize,
        operator_count: usize,
        warnings: &mut Vec<CompileWarning>,
    ) {
        let limits = &self.rules.limits;

        if let Some(max) = limits.max_query_length {
            let length = compiled.chars().count();
            if length > max {
                warnings.push(CompileWarning::QueryTooLong { length, max });
            }
        }
        if let Some(max) = limits.max_nesting_depth
            && max_depth > max
        {
            warnings.push(CompileWarning::NestingTooDeep {
                depth: max_depth,
                max,
            });
        }
        if let Some(max) = limits.max_operators
            && operator_count > max
        {
            warnings.push(CompileWarning::TooManyOperators {
                count: operator_count,
                max,
            });
        }
    }
}

/// Consumes one atom or operator lexeme, quote-aware, returning its
/// slice of the input.
fn take_lexeme<'a>(
    text: &'a str,
    iter: &mut Peekable<CharIndices<'a>>,
    start: usize,
) -> &'a str {
    let mut end = start;
    let mut in_quote: Option<char> = None;

    while let Some(&(i, c)) = iter.peek() {
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
                iter.next();
                end = i + c.len_utf8();
            }
            None => {
                if c == '(' || c == ')' || c.is_whitespace() {
                    break;
                }
                if QuoteStyle::from_char(c).is_some() {
                    in_quote = Some(c);
                }
                iter.next();
                end = i + c.len_utf8();
            }
        }
    }

    &text[start..end]
}

/// Compiles a canonical expression for a built-in dialect.
pub fn compile_for_dialect(
    canonical: &str,
    dialect: &str,
) -> Result<(String, Vec<CompileWarning>), crate::error::DialectError> {
    let rules = DialectRules::builtin(dialect)?;
    Ok(DialectCompiler::new(rules).compile(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiler(dialect: &str) -> DialectCompiler {
        DialectCompiler::new(DialectRules::builtin(dialect).unwrap())
    }

    fn compile_clean(dialect: &str, canonical: &str) -> String {
        let (out, warnings) = compiler(dialect).compile(canonical);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        out
    }

    #[test]
    fn pubmed_passes_canonical_through() {
        let canonical = "((\"cancer\"[MeSH]) AND (2015:2025[pdat]))";
        assert_eq!(compile_clean("pubmed", canonical), canonical);
    }

    #[test]
    fn europepmc_renames_field_codes() {
        assert_eq!(
            compile_clean("europepmc", "((\"cancer\"[MeSH]) AND (\"tumor\"[TIAB]))"),
            "((KEYWORD:\"cancer\") AND (TITLE_ABSTRACT:\"tumor\"))"
        );
    }

    #[test]
    fn europepmc_rewrites_year_ranges() {
        assert_eq!(
            compile_clean(
                "europepmc",
                "(((cancer) OR (tumor)) AND (2015:2025[pdat]))"
            ),
            "(((cancer) OR (tumor)) AND (PUB_YEAR:(2015 TO 2025)))"
        );
    }

    #[test]
    fn europepmc_rewrites_quoted_year_ranges() {
        assert_eq!(
            compile_clean("europepmc", "(\"2015:2025\"[pdat])"),
            "(PUB_YEAR:(2015 TO 2025))"
        );
    }

    #[test]
    fn europepmc_warns_on_unknown_code() {
        let (out, warnings) = compiler("europepmc").compile("(\"x\"[OBSCURE])");
        assert_eq!(out, "(\"x\"[OBSCURE])");
        assert_eq!(
            warnings,
            vec![CompileWarning::UnknownFieldCode {
                code: "OBSCURE".into()
            }]
        );
    }

    #[test]
    fn cochrane_strips_field_tags() {
        assert_eq!(
            compile_clean("cochrane", "((\"cancer\"[MeSH]) AND (treatment))"),
            "((\"cancer\") AND (treatment))"
        );
    }

    #[test]
    fn cochrane_strips_date_tag() {
        assert_eq!(
            compile_clean("cochrane", "((cancer) AND (2015:2025[pdat]))"),
            "((cancer) AND (2015:2025))"
        );
    }

    #[test]
    fn operators_and_phrases_pass_through() {
        let canonical = "((\"Coenzym Q10\") NOT (animal))";
        assert_eq!(compile_clean("europepmc", canonical), canonical);
    }

    #[test]
    fn single_quoted_terms_keep_their_style() {
        assert_eq!(
            compile_clean("europepmc", "(('cancer'[TIAB]) OR (x))"),
            "((TITLE_ABSTRACT:'cancer') OR (x))"
        );
    }

    #[test]
    fn untagged_year_range_untouched() {
        assert_eq!(
            compile_clean("europepmc", "((cancer) AND (2015:2025))"),
            "((cancer) AND (2015:2025))"
        );
    }

    #[test]
    fn custom_operator_spellings_apply() {
        let rules = DialectRules::from_toml_str(
            "name = \"custom\"\n\n[operators]\nAND = \"&&\"\n",
            "test",
        )
        .unwrap();
        let (out, _) = DialectCompiler::new(rules).compile("((a) AND (b))");
        assert_eq!(out, "((a) && (b))");
    }

    #[test]
    fn nesting_depth_warning() {
        let rules = DialectRules::from_toml_str(
            "name = \"shallow\"\n\n[limits]\nmax_nesting_depth = 2\n",
            "test",
        )
        .unwrap();
        // Depth 3 is one over the bound: warn, do not fail.
        let (out, warnings) = DialectCompiler::new(rules).compile("(((a) OR (b)) AND (c))");
        assert_eq!(out, "(((a) OR (b)) AND (c))");
        assert_eq!(
            warnings,
            vec![CompileWarning::NestingTooDeep { depth: 3, max: 2 }]
        );
    }

    #[test]
    fn operator_count_warning() {
        let rules = DialectRules::from_toml_str(
            "name = \"tiny\"\n\n[limits]\nmax_operators = 1\n",
            "test",
        )
        .unwrap();
        let (_, warnings) = DialectCompiler::new(rules).compile("((a) AND (b) AND (c))");
        assert_eq!(
            warnings,
            vec![CompileWarning::TooManyOperators { count: 2, max: 1 }]
        );
    }

    #[test]
    fn query_length_warning() {
        let rules = DialectRules::from_toml_str(
            "name = \"short\"\n\n[limits]\nmax_query_length = 10\n",
            "test",
        )
        .unwrap();
        let (out, warnings) = DialectCompiler::new(rules).compile("((alpha) AND (beta))");
        assert_eq!(
            warnings,
            vec![CompileWarning::QueryTooLong {
                length: out.chars().count(),
                max: 10
            }]
        );
    }

    #[test]
    fn convenience_entry_point() {
        let (out, warnings) =
            compile_for_dialect("((cancer) AND (2015:2025[pdat]))", "europepmc").unwrap();
        assert_eq!(out, "((cancer) AND (PUB_YEAR:(2015 TO 2025)))");
        assert!(warnings.is_empty());

        assert!(compile_for_dialect("(x)", "scopus").is_err());
    }

    #[test]
    fn warning_display() {
        assert_eq!(
            CompileWarning::UnknownFieldCode { code: "XYZ".into() }.to_string(),
            "unknown field code [XYZ] passed through unchanged"
        );
        assert!(
            CompileWarning::NestingTooDeep { depth: 9, max: 8 }
                .to_string()
                .contains("9 levels deep")
        );
    }
}
