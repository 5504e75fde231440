//! Detection rules for token-detector
//!
//! A [`Rule`] is a named, coloured regular expression that can be switched
//! on and off. A [`RuleSet`] is evaluated in insertion order.

pub mod defaults;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::colour::Colour;
use crate::error::RuleError;

/// A user-editable detection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Disabled rules are kept in the store but never evaluated
    pub enabled: bool,

    /// Display name, not required to be unique
    pub name: String,

    /// Highlight applied to a matching request
    pub colour: Colour,

    /// Pattern searched for anywhere in a request field
    pub regex: String,
}

/// Ordered rule collection; order is evaluation order
pub type RuleSet = Vec<Rule>;

impl Rule {
    /// Create a new rule
    pub fn new(
        enabled: bool,
        name: impl Into<String>,
        colour: Colour,
        regex: impl Into<String>,
    ) -> Self {
        Self {
            enabled,
            name: name.into(),
            colour,
            regex: regex.into(),
        }
    }

    /// Compile this rule's pattern
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.regex)
    }

}

/// Check that a pattern is non-empty and compiles, reporting failures against a 0-based row
pub fn validate_regex(row: usize, pattern: &str) -> Result<(), RuleError> {
    if pattern.is_empty() {
        return Err(RuleError::InvalidRegex {
            row: row + 1,
            message: "pattern is empty".to_string(),
        });
    }
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| RuleError::InvalidRegex {
            row: row + 1,
            message: e.to_string(),
        })
}

/// Check every rule, enabled or not; the first bad row wins
pub fn validate_all(rules: &[Rule]) -> Result<(), RuleError> {
    for (row, rule) in rules.iter().enumerate() {
        validate_regex(row, &rule.regex)?;
    }
    Ok(())
}

/// The enabled rules, in their stored order
pub fn enabled(rules: &[Rule]) -> RuleSet {
    rules.iter().filter(|r| r.enabled).cloned().collect()
}
