//! JSONL audit logging for token-detector
//!
//! Records the outcome of every handled request to a JSONL file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::colour::Colour;
use crate::output::Detection;
use crate::request::RequestView;

/// Log level for audit entries
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Matched,
    Clean,
    Skipped,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    /// MATCHED, CLEAN or SKIPPED (marking off)
    pub level: LogLevel,

    pub method: String,

    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,

    /// Field the rule matched in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from a request and its detection
    pub fn new(request: &dyn RequestView, detection: &Detection, skipped: bool) -> Self {
        let mut entry = Self {
            timestamp: Utc::now(),
            level: LogLevel::Clean,
            method: request.method().to_string(),
            url: request.url().to_string(),
            rule: None,
            colour: None,
            field: None,
            note: None,
        };

        if skipped {
            entry.level = LogLevel::Skipped;
        } else if let Detection::Match(m) = detection {
            entry.level = LogLevel::Matched;
            entry.rule = Some(m.rule_name.clone());
            entry.colour = Some(m.colour);
            entry.field = Some(m.field.to_string());
            entry.note = Some(m.note.clone());
        }

        entry
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger; `None` or an unopenable path disables it
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "audit log disabled");
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a detection
    pub fn log_detection(
        &mut self,
        request: &dyn RequestView,
        detection: &Detection,
        skipped: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(request, detection, skipped);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MatchedField;
    use crate::request::HttpRequest;
    use tempfile::NamedTempFile;

    fn test_request() -> HttpRequest {
        HttpRequest::new("GET", "http://app.local/?q=1")
    }

    fn test_match() -> Detection {
        Detection::matched(
            "JWT token",
            "eyJ",
            Colour::Orange,
            MatchedField::Header("Authorization".to_string()),
        )
    }

    #[test]
    fn test_audit_entry_clean() {
        let entry = AuditEntry::new(&test_request(), &Detection::NoMatch, false);
        assert!(matches!(entry.level, LogLevel::Clean));
        assert!(entry.rule.is_none());
    }

    #[test]
    fn test_audit_entry_matched() {
        let entry = AuditEntry::new(&test_request(), &test_match(), false);
        assert!(matches!(entry.level, LogLevel::Matched));
        assert_eq!(entry.rule, Some("JWT token".to_string()));
        assert_eq!(entry.field, Some("header:Authorization".to_string()));
    }

    #[test]
    fn test_audit_entry_skipped() {
        let entry = AuditEntry::new(&test_request(), &Detection::NoMatch, true);
        assert!(matches!(entry.level, LogLevel::Skipped));
    }

    #[test]
    fn test_audit_logger_write() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path();

        let mut logger = AuditLogger::new(Some(path));
        assert!(logger.is_enabled());

        logger
            .log_detection(&test_request(), &test_match(), false)
            .unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("\"level\":\"MATCHED\""));
        assert!(content.contains("\"colour\":\"ORANGE\""));
        assert!(content.contains("JWT token"));
    }

    #[test]
    fn test_audit_logger_disabled() {
        let mut logger = AuditLogger::default();
        assert!(!logger.is_enabled());
        logger
            .log_detection(&test_request(), &Detection::NoMatch, false)
            .unwrap();
    }
}
