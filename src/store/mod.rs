//! Persistence of the rule set
//!
//! The whole rule collection, disabled rules included, lives under a single
//! preference key as a versioned JSON document. Anything that cannot be
//! decoded is treated as absent and replaced by the built-in defaults.

pub mod preferences;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::rules::{self, defaults, Rule, RuleSet};

pub use preferences::{FilePreferences, MemoryPreferences, Preferences};

/// Preference key holding the encoded rules
pub const PREF_KEY: &str = "token_detector.rules.v1";

/// Version written into every encoded document
pub const ENCODING_VERSION: u32 = 1;

#[derive(Serialize)]
struct EncodedRulesRef<'a> {
    version: u32,
    rules: &'a [Rule],
}

#[derive(Deserialize)]
struct EncodedRules {
    version: u32,
    rules: Vec<Rule>,
}

/// Encode a rule set for storage
pub fn encode(rules: &[Rule]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EncodedRulesRef {
        version: ENCODING_VERSION,
        rules,
    })
}

/// Decode a stored rule set, falling back to the defaults
pub fn decode(blob: Option<&str>) -> RuleSet {
    let blob = match blob.map(str::trim) {
        Some(blob) if !blob.is_empty() => blob,
        _ => return defaults::default_rules(),
    };

    match serde_json::from_str::<EncodedRules>(blob) {
        Ok(doc) if doc.version == ENCODING_VERSION => doc.rules,
        Ok(doc) => {
            tracing::warn!(version = doc.version, "unsupported rule encoding, using defaults");
            defaults::default_rules()
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored rules are unreadable, using defaults");
            defaults::default_rules()
        }
    }
}

/// Loads and saves the rule set through a [`Preferences`] backend
pub struct RuleStore {
    prefs: Arc<dyn Preferences>,
    write_lock: Mutex<()>,
    generation: AtomicU64,
}

impl RuleStore {
    /// Create a store over the given preferences
    pub fn new(prefs: Arc<dyn Preferences>) -> Self {
        Self {
            prefs,
            write_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Every stored rule, or the defaults when nothing usable is stored
    pub fn load_all(&self) -> RuleSet {
        decode(self.encoded().as_deref())
    }

    /// Stored rules that are enabled, in order
    pub fn load_enabled(&self) -> RuleSet {
        rules::enabled(&self.load_all())
    }

    /// Persist the full rule set
    ///
    /// Every regex is checked first. On any failure the previously stored
    /// value is left untouched.
    pub fn save_all(&self, rules: &[Rule]) -> Result<(), StoreError> {
        rules::validate_all(rules)?;
        let encoded = encode(rules)?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.prefs.set_string(PREF_KEY, &encoded)?;
        self.generation.fetch_add(1, Ordering::Release);
        tracing::debug!(rules = rules.len(), "saved rules");
        Ok(())
    }

    /// The built-in rule set
    pub fn defaults() -> RuleSet {
        defaults::default_rules()
    }

    /// Overwrite the stored rules with the defaults
    pub fn reset_to_defaults(&self) -> Result<RuleSet, StoreError> {
        let rules = Self::defaults();
        self.save_all(&rules)?;
        Ok(rules)
    }

    /// Raw stored value
    pub fn encoded(&self) -> Option<String> {
        self.prefs.get_string(PREF_KEY)
    }

    /// Count of successful saves through this store
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
