//! Detection results and the annotation handed back to the host
//!
//! The engine produces a [`Detection`]; the host only ever sees an
//! [`Annotation`], and only when something matched.

use serde::Serialize;
use std::fmt;

use crate::colour::{Colour, HighlightColor};

/// Where in the request a rule matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "field", content = "name")]
pub enum MatchedField {
    Header(String),
    Url,
    Query,
    Body,
}

impl fmt::Display for MatchedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedField::Header(name) => write!(f, "header:{}", name),
            MatchedField::Url => f.write_str("url"),
            MatchedField::Query => f.write_str("query"),
            MatchedField::Body => f.write_str("body"),
        }
    }
}

/// A rule that matched a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub rule_name: String,
    pub colour: Colour,
    pub field: MatchedField,
    pub note: String,
}

/// Outcome of scanning one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    NoMatch,
    Match(TokenMatch),
}

impl Detection {
    /// Build a match; the note names the rule and its pattern
    pub fn matched(rule_name: &str, regex: &str, colour: Colour, field: MatchedField) -> Self {
        Detection::Match(TokenMatch {
            rule_name: rule_name.to_string(),
            colour,
            field,
            note: format!("{} matched via {}", rule_name, regex),
        })
    }

    /// Check if any rule matched
    pub fn is_match(&self) -> bool {
        matches!(self, Detection::Match(_))
    }

    /// Colour of the matching rule
    pub fn colour(&self) -> Option<Colour> {
        match self {
            Detection::NoMatch => None,
            Detection::Match(m) => Some(m.colour),
        }
    }

    /// Note describing the match
    pub fn note(&self) -> Option<&str> {
        match self {
            Detection::NoMatch => None,
            Detection::Match(m) => Some(&m.note),
        }
    }

    /// Translate into the host annotation; no match means no annotation
    pub fn to_annotation(&self) -> Option<Annotation> {
        match self {
            Detection::NoMatch => None,
            Detection::Match(m) => Some(Annotation {
                highlight: m.colour.to_highlight(),
                notes: m.note.clone(),
            }),
        }
    }
}

/// Marking applied by the host to a flagged request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub highlight: HighlightColor,
    pub notes: String,
}

impl Annotation {
    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// JSON for an optional annotation; `{}` when there is none
pub fn annotation_json(annotation: Option<&Annotation>) -> String {
    annotation.map_or_else(|| "{}".to_string(), Annotation::to_json)
}
