//! Configuration loading for token-detector
//!
//! Supports TOML configuration with embedded defaults.

use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable that turns request marking off
pub const DISABLED_ENV: &str = "TOKEN_DETECTOR_DISABLED";

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Global switch for marking requests
    pub mark_requests: bool,

    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mark_requests: true,
            audit_log: false,
            audit_path: Some("~/.token-detector/audit.jsonl".to_string()),
        }
    }
}

/// Rule storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Preferences file holding the encoded rule set
    pub preferences_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preferences_path: "~/.token-detector/preferences.toml".to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::home_dir().map(|p| p.join(".token-detector/config.toml")),
            Some(PathBuf::from("/etc/token-detector/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                        }
                    }
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Marking is on in config and not switched off via environment
    pub fn mark_requests(&self) -> bool {
        self.general.mark_requests && std::env::var_os(DISABLED_ENV).is_none()
    }

    /// Get the audit log path (expanded), if audit logging is on
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_ref().map(|p| Self::expand_path(p))
    }

    /// Get the preferences file path (expanded)
    pub fn preferences_path(&self) -> PathBuf {
        Self::expand_path(&self.store.preferences_path)
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
mark_requests = true
audit_log = false
audit_path = "~/.token-detector/audit.jsonl"

[store]
preferences_path = "~/.token-detector/preferences.toml"
"#;
