//! Detection engine for token-detector
//!
//! Rules are tried in stored order. For each rule the request fields are
//! searched in a fixed order (every header value, the URL, the decoded query,
//! then the body) and the first hit ends the scan.

pub mod cache;

use std::borrow::Cow;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use regex::Regex;

use crate::colour::Colour;
use crate::output::{Detection, MatchedField};
use crate::request::{Header, RequestView};
use crate::rules::Rule;

pub use cache::RegexCache;

/// Scan a request against a rule set
///
/// Disabled and uncompilable rules are skipped. Never fails.
pub fn detect(request: &dyn RequestView, rules: &[Rule]) -> Detection {
    if rules.is_empty() {
        return Detection::NoMatch;
    }
    CompiledRules::compile(rules).detect(request)
}

/// A rule with its pattern already compiled
#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    colour: Colour,
    pattern: String,
    regex: Arc<Regex>,
}

/// An immutable, pre-compiled snapshot of a rule set
///
/// Safe to share between concurrent scans.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Compile every usable rule, keeping stored order
    pub fn compile(rules: &[Rule]) -> Self {
        Self::build(rules, |pattern| Regex::new(pattern).map(Arc::new))
    }

    /// Compile, reusing patterns already in the cache
    pub fn compile_cached(rules: &[Rule], cache: &RegexCache) -> Self {
        Self::build(rules, |pattern| cache.get_or_compile(pattern))
    }

    fn build<F>(rules: &[Rule], mut compile: F) -> Self
    where
        F: FnMut(&str) -> Result<Arc<Regex>, regex::Error>,
    {
        let compiled = rules
            .iter()
            .filter(|rule| rule.enabled)
            .filter_map(|rule| match compile(&rule.regex) {
                Ok(regex) => Some(CompiledRule {
                    name: rule.name.clone(),
                    colour: rule.colour,
                    pattern: rule.regex.clone(),
                    regex,
                }),
                Err(e) => {
                    tracing::warn!(rule = %rule.name, error = %e, "skipping rule with invalid regex");
                    None
                }
            })
            .collect();

        Self { rules: compiled }
    }

    /// Number of rules that will be evaluated
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if nothing will ever match
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the rules that will be evaluated, in order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Scan a request; the first rule to hit any field wins
    pub fn detect(&self, request: &dyn RequestView) -> Detection {
        if self.rules.is_empty() {
            return Detection::NoMatch;
        }

        let fields = Fields::new(request);

        for rule in &self.rules {
            if let Some(field) = fields.find(&rule.regex) {
                tracing::debug!(rule = %rule.name, field = %field, "token rule matched");
                return Detection::matched(&rule.name, &rule.pattern, rule.colour, field);
            }
        }

        Detection::NoMatch
    }
}

/// Request fields, fetched at most once per scan and only when needed
struct Fields<'r> {
    request: &'r dyn RequestView,
    headers: Vec<Header<'r>>,
    query: OnceCell<String>,
    body: OnceCell<Cow<'r, str>>,
}

impl<'r> Fields<'r> {
    fn new(request: &'r dyn RequestView) -> Self {
        Self {
            request,
            headers: request.headers(),
            query: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    fn find(&self, regex: &Regex) -> Option<MatchedField> {
        if let Some(header) = self.headers.iter().find(|h| regex.is_match(h.value)) {
            return Some(MatchedField::Header(header.name.to_string()));
        }
        if regex.is_match(self.request.url()) {
            return Some(MatchedField::Url);
        }
        if regex.is_match(self.query.get_or_init(|| self.request.query())) {
            return Some(MatchedField::Query);
        }
        if regex.is_match(self.body.get_or_init(|| self.request.body())) {
            return Some(MatchedField::Body);
        }
        None
    }
}
