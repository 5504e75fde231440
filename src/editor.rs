//! Rule editing model
//!
//! Backs a rules table with the columns Enabled, Name, Colour and Regex
//! pattern. Rows are 0-based here; errors report them 1-based as the user
//! sees them.

use crate::colour::Colour;
use crate::error::{RuleError, StoreError};
use crate::rules::{self, Rule, RuleSet};
use crate::store::RuleStore;

/// Column headings, in display order
pub const COLUMNS: [&str; 4] = ["Enabled", "Name", "Colour", "Regex pattern"];

/// Search keywords for the host's settings dialog
pub const KEYWORDS: [&str; 6] = ["token", "regex", "pattern", "colour", "detector", "highlight"];

/// An editable working copy of the rule set
#[derive(Debug, Clone, Default)]
pub struct RulesEditor {
    rules: RuleSet,
}

impl RulesEditor {
    /// Start editing a copy of the stored rules
    pub fn load(store: &RuleStore) -> Self {
        Self::from_rules(store.load_all())
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a placeholder rule and return its row
    pub fn add_rule(&mut self) -> usize {
        self.push(Rule::new(true, "New rule", Colour::Gray, ""))
    }

    /// Append a rule after checking its pattern
    pub fn insert(&mut self, rule: Rule) -> Result<usize, RuleError> {
        rules::validate_regex(self.rules.len(), &rule.regex)?;
        Ok(self.push(rule))
    }

    fn push(&mut self, rule: Rule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Delete rows; duplicates and out-of-range rows are ignored
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        for row in rows.into_iter().rev() {
            if row < self.rules.len() {
                self.rules.remove(row);
            }
        }
    }

    /// Enable or disable several rows at once
    pub fn set_enabled(&mut self, rows: &[usize], enabled: bool) -> Result<(), RuleError> {
        for &row in rows {
            self.row_mut(row)?.enabled = enabled;
        }
        Ok(())
    }

    pub fn set_name(&mut self, row: usize, name: impl Into<String>) -> Result<(), RuleError> {
        self.row_mut(row)?.name = name.into();
        Ok(())
    }

    pub fn set_colour(&mut self, row: usize, colour: Colour) -> Result<(), RuleError> {
        self.row_mut(row)?.colour = colour;
        Ok(())
    }

    /// Change a row's pattern; an invalid pattern leaves the old one in place
    pub fn set_regex(&mut self, row: usize, pattern: impl Into<String>) -> Result<(), RuleError> {
        let pattern = pattern.into();
        rules::validate_regex(row, &pattern)?;
        self.row_mut(row)?.regex = pattern;
        Ok(())
    }

    /// First row whose pattern does not compile
    pub fn validate_all(&self) -> Result<(), RuleError> {
        rules::validate_all(&self.rules)
    }

    /// Validate and persist every row
    pub fn save(&self, store: &RuleStore) -> Result<(), StoreError> {
        self.validate_all()?;
        store.save_all(&self.rules)
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut Rule, RuleError> {
        let len = self.rules.len();
        self.rules
            .get_mut(row)
            .ok_or(RuleError::NoSuchRow { row: row + 1, len })
    }
}
