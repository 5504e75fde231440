//! String key-value preference backends
//!
//! [`Preferences`] is the only persistence API the rule store needs. Hosts
//! with their own settings storage implement it directly; the CLI uses
//! [`FilePreferences`].

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

/// Durable string key-value storage
pub trait Preferences: Send + Sync {
    /// Stored value, or `None` when the key was never set
    fn get_string(&self, key: &str) -> Option<String>;

    /// Store a value, replacing any previous one
    fn set_string(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-process preferences
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "preferences lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a TOML table on disk
///
/// Only string entries are visible through [`Preferences`]; entries of any
/// other type are carried through writes untouched. Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers see either the old file or the new one.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current table; a missing file reads as empty
    fn read_table(&self) -> io::Result<toml::Table> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => return Err(e),
        };
        content
            .parse::<toml::Table>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Preferences for FilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        let table = match self.read_table() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable preferences file");
                return None;
            }
        };
        table.get(key)?.as_str().map(String::from)
    }

    /// Fails without touching the file when the existing content is not TOML
    fn set_string(&self, key: &str, value: &str) -> io::Result<()> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        let content = toml::to_string(&table)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
