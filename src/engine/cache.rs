//! Compiled regex cache keyed by pattern text

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use regex::Regex;

/// Patterns compiled so far; shared by every snapshot built from it
#[derive(Debug, Default)]
pub struct RegexCache {
    compiled: RwLock<HashMap<String, Arc<Regex>>>,
}

impl RegexCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled pattern, compiling it on first use
    ///
    /// Patterns that fail to compile are not cached.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Ok(compiled) = self.compiled.read() {
            if let Some(regex) = compiled.get(pattern) {
                return Ok(Arc::clone(regex));
            }
        }

        let regex = Arc::new(Regex::new(pattern)?);
        if let Ok(mut compiled) = self.compiled.write() {
            compiled
                .entry(pattern.to_string())
                .or_insert_with(|| Arc::clone(&regex));
        }
        Ok(regex)
    }

    /// Drop patterns no longer used by any rule in `keep`
    pub fn retain<'a>(&self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: Vec<&str> = keep.into_iter().collect();
        if let Ok(mut compiled) = self.compiled.write() {
            compiled.retain(|pattern, _| keep.contains(&pattern.as_str()));
        }
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.compiled.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
