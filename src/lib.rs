//! token-detector - Flag authentication tokens in intercepted HTTP requests
//!
//! An intercepting proxy hands each request to a [`TokenHandler`], which
//! runs the user's regex rules over the request and returns a highlight
//! colour plus a note when one of them matches.
//!
//! # Features
//!
//! - **Ordered rules**: first enabled rule to match wins
//! - **Fixed field order**: header values, URL, decoded query, then body
//! - **Built-in defaults**: LTPA2, JWT and PASETO rules on first run
//! - **Durable rule store**: versioned encoding under one preference key,
//!   falling back to defaults when the stored value is unreadable
//! - **Audit logging**: JSONL log of every handled request
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use token_detector::{HttpRequest, MemoryPreferences, RuleStore, TokenHandler};
//! use token_detector::colour::HighlightColor;
//!
//! let store = Arc::new(RuleStore::new(Arc::new(MemoryPreferences::new())));
//! let handler = TokenHandler::new(store, true);
//!
//! let request = HttpRequest::new("GET", "http://app.local/")
//!     .with_header("Cookie", "LtpaToken2=AbCd1234;");
//!
//! let annotation = handler.handle_request(&request).unwrap();
//! assert_eq!(annotation.highlight, HighlightColor::Red);
//! ```

pub mod audit;
pub mod colour;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod handler;
pub mod output;
pub mod request;
pub mod rules;
pub mod store;

// Re-exports for convenience
pub use colour::Colour;
pub use config::Config;
pub use editor::RulesEditor;
pub use engine::{detect, CompiledRules};
pub use error::{RuleError, StoreError};
pub use handler::TokenHandler;
pub use output::{Annotation, Detection};
pub use request::{HttpRequest, RequestView};
pub use rules::{Rule, RuleSet};
pub use store::{FilePreferences, MemoryPreferences, Preferences, RuleStore};
