//! Syntax-rule resources.
//!
//! A dialect is described by a TOML document enumerating its field-code
//! rewrites, date-range surface form, operator spellings, and validation
//! limits. Rules for the three supported databases are embedded in the
//! binary; arbitrary rule files can be loaded from disk, so adding a
//! dialect never requires a code change.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::error::DialectError;

/// Built-in PubMed rules (valid TOML).
const PUBMED_RULES: &str = include_str!("../resources/pubmed.toml");

/// Built-in Europe PMC rules (valid TOML).
const EUROPE_PMC_RULES: &str = include_str!("../resources/europepmc.toml");

/// Built-in Cochrane rules (valid TOML).
const COCHRANE_RULES: &str = include_str!("../resources/cochrane.toml");

/// Names of the built-in dialects, in display order.
pub const BUILTIN_DIALECTS: [&str; 3] = ["pubmed", "europepmc", "cochrane"];

/// What to do with a field term carrying a given code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    /// Emit the token verbatim.
    Pass,
    /// Drop the bracketed code, keeping the quoted phrase.
    Strip,
    /// Compile `"term"[CODE]` to `SURFACE:"term"`.
    Rename(String),
}

impl FieldAction {
    /// Parses an action from its TOML value.
    ///
    /// `PASS` and `STRIP` are reserved words; anything else is the
    /// dialect surface name for the code.
    fn from_value(value: &str) -> Self {
        match value {
            "PASS" => Self::Pass,
            "STRIP" => Self::Strip,
            other => Self::Rename(other.to_string()),
        }
    }
}

/// Dialect-specific validation bounds, enforced as warnings only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Longest compiled query the database accepts.
    pub max_query_length: Option<usize>,
    /// Deepest parenthesis nesting the database accepts.
    pub max_nesting_depth: Option<usize>,
    /// Most boolean operators the database accepts.
    pub max_operators: Option<usize>,
}

/// Raw rule document as parsed directly from TOML.
///
/// All fields are optional; this mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawRules {
    /// Dialect name.
    name: Option<String>,
    /// One-line description for listings.
    description: Option<String>,
    /// Policy for codes missing from `field_codes`.
    default_action: Option<String>,
    /// Canonical code -> "PASS" | "STRIP" | surface name.
    field_codes: Option<BTreeMap<String, String>>,
    /// Date-range settings.
    dates: Option<RawDates>,
    /// Canonical operator -> dialect spelling.
    operators: Option<BTreeMap<String, String>>,
    /// Validation limits.
    limits: Option<RawLimits>,
}

/// Raw `[dates]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawDates {
    /// Field code marking a publication-year range.
    code: Option<String>,
    /// Template with `{lower}` and `{upper}` placeholders.
    range_template: Option<String>,
}

/// Raw `[limits]` section.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct RawLimits {
    /// Longest compiled query.
    max_query_length: Option<usize>,
    /// Deepest nesting.
    max_nesting_depth: Option<usize>,
    /// Most operators.
    max_operators: Option<usize>,
}

/// Resolved, immutable rules for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectRules {
    /// Dialect name.
    pub name: String,
    /// One-line description for listings.
    pub description: String,
    /// Policy for unknown codes; `None` means pass through with a warning.
    default_action: Option<FieldAction>,
    /// Per-code actions, keyed by lowercased canonical code.
    field_codes: BTreeMap<String, FieldAction>,
    /// Field code marking a publication-year range.
    pub date_code: String,
    /// Year-range surface template, if the dialect rewrites ranges.
    pub date_range_template: Option<String>,
    /// Operator surface spellings, keyed by canonical spelling.
    operators: BTreeMap<String, String>,
    /// Validation bounds.
    pub limits: Limits,
}

impl DialectRules {
    /// Parses a rule document from a TOML string.
    ///
    /// The `origin` parameter is used for error reporting.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, DialectError> {
        let raw: RawRules =
            toml::from_str(contents).map_err(|source| DialectError::ParseRules {
                origin: origin.to_string(),
                source,
            })?;

        let dates = raw.dates.unwrap_or_default();
        let date_range_template = dates.range_template;
        if let Some(template) = &date_range_template
            && (!template.contains("{lower}") || !template.contains("{upper}"))
        {
            return Err(DialectError::BadTemplate {
                template: template.clone(),
            });
        }

        let field_codes = raw
            .field_codes
            .unwrap_or_default()
            .into_iter()
            .map(|(code, value)| (code.to_ascii_lowercase(), FieldAction::from_value(&value)))
            .collect();

        let limits_raw = raw.limits.unwrap_or_default();

        Ok(Self {
            name: raw.name.unwrap_or_else(|| origin.to_string()),
            description: raw.description.unwrap_or_default(),
            default_action: raw.default_action.as_deref().map(FieldAction::from_value),
            field_codes,
            date_code: dates.code.unwrap_or_else(|| "pdat".to_string()),
            date_range_template,
            operators: raw.operators.unwrap_or_default(),
            limits: Limits {
                max_query_length: limits_raw.max_query_length,
                max_nesting_depth: limits_raw.max_nesting_depth,
                max_operators: limits_raw.max_operators,
            },
        })
    }

    /// Loads a rule document from disk.
    pub fn load(path: &Path) -> Result<Self, DialectError> {
        let contents = fs::read_to_string(path).map_err(|source| DialectError::ReadRules {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Returns the embedded rules for a built-in dialect.
    pub fn builtin(name: &str) -> Result<Self, DialectError> {
        let contents = match name.to_ascii_lowercase().as_str() {
            "pubmed" => PUBMED_RULES,
            "europepmc" | "europe_pmc" => EUROPE_PMC_RULES,
            "cochrane" => COCHRANE_RULES,
            _ => {
                return Err(DialectError::UnknownDialect {
                    name: name.to_string(),
                });
            }
        };
        Self::from_toml_str(contents, name)
    }

    /// Looks up the action for a field code, case-insensitively.
    ///
    /// `None` means the code is unknown to this dialect; the compiler
    /// then applies `default_action` or warns.
    pub fn action_for(&self, code: &str) -> Option<&FieldAction> {
        self.field_codes.get(&code.to_ascii_lowercase())
    }

    /// The policy for codes not present in the code map, if any.
    pub fn default_action(&self) -> Option<&FieldAction> {
        self.default_action.as_ref()
    }

    /// Dialect spelling for a canonical operator, if it diverges.
    pub fn operator_surface(&self, canonical: &str) -> Option<&str> {
        self.operators.get(canonical).map(String::as_str)
    }

    /// Renders the year-range template, if the dialect has one.
    pub fn render_date_range(&self, lower: &str, upper: &str) -> Option<String> {
        self.date_range_template
            .as_ref()
            .map(|t| t.replace("{lower}", lower).replace("{upper}", upper))
    }
}
