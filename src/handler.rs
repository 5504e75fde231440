//! Host-side request handler
//!
//! The intercepting host calls [`TokenHandler::handle_request`] for every
//! request it sees, whether just received or about to be sent, and applies
//! the returned annotation if there is one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::engine::{CompiledRules, RegexCache};
use crate::output::{Annotation, Detection};
use crate::request::RequestView;
use crate::store::RuleStore;

/// Compiled rules together with the store generation they came from
struct Snapshot {
    generation: u64,
    rules: Arc<CompiledRules>,
}

/// Runs detection with the currently stored rules
pub struct TokenHandler {
    store: Arc<RuleStore>,
    mark_requests: AtomicBool,
    cache: RegexCache,
    snapshot: RwLock<Option<Snapshot>>,
}

impl TokenHandler {
    /// Create a handler over a rule store
    pub fn new(store: Arc<RuleStore>, mark_requests: bool) -> Self {
        Self {
            store,
            mark_requests: AtomicBool::new(mark_requests),
            cache: RegexCache::new(),
            snapshot: RwLock::new(None),
        }
    }

    /// Whether requests are currently being marked
    pub fn marking_enabled(&self) -> bool {
        self.mark_requests.load(Ordering::Relaxed)
    }

    /// Flip the global "mark requests" setting
    pub fn set_marking_enabled(&self, enabled: bool) {
        self.mark_requests.store(enabled, Ordering::Relaxed);
    }

    /// The rule store this handler reads from
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Scan a request; `NoMatch` when marking is off
    pub fn detect(&self, request: &dyn RequestView) -> Detection {
        if !self.marking_enabled() {
            return Detection::NoMatch;
        }
        self.current_rules().detect(request)
    }

    /// Annotation to apply to a request, if any
    pub fn handle_request(&self, request: &dyn RequestView) -> Option<Annotation> {
        self.detect(request).to_annotation()
    }

    /// Drop the compiled rules so the next scan reloads them
    ///
    /// Needed when the preferences were changed behind the store's back.
    pub fn reload(&self) {
        if let Ok(mut snapshot) = self.snapshot.write() {
            *snapshot = None;
        }
    }

    /// Enabled rules compiled from the store, rebuilt only after a save
    pub fn current_rules(&self) -> Arc<CompiledRules> {
        let generation = self.store.generation();

        if let Ok(snapshot) = self.snapshot.read() {
            if let Some(snapshot) = snapshot.as_ref() {
                if snapshot.generation == generation {
                    return Arc::clone(&snapshot.rules);
                }
            }
        }

        let enabled = self.store.load_enabled();
        let compiled = Arc::new(CompiledRules::compile_cached(&enabled, &self.cache));
        self.cache.retain(enabled.iter().map(|r| r.regex.as_str()));
        tracing::debug!(rules = compiled.len(), "rebuilt rule snapshot");

        if let Ok(mut snapshot) = self.snapshot.write() {
            *snapshot = Some(Snapshot {
                generation,
                rules: Arc::clone(&compiled),
            });
        }
        compiled
    }
}
