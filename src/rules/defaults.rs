//! Built-in rules shown on first run
//!
//! These are ordinary rules: the engine has no special handling for them,
//! and users can edit, disable or delete them like any other.

use crate::colour::Colour;
use crate::rules::{Rule, RuleSet};

/// LTPA2 cookie assignment, value up to the next `;`
pub const LTPA2_PATTERN: &str = r"(?i)\bLtpaToken2=[^;]+";

/// Compact JWS/JWT: header.payload.signature in base64url
pub const JWT_PATTERN: &str = r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+";

/// PASETO: vN.local|public.<payload>[.<footer>]
pub const PASETO_PATTERN: &str = r"v[0-9]\.(local|public)\.[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)?";

/// The default rule set: LTPA2, JWT, PASETO, all enabled
pub fn default_rules() -> RuleSet {
    vec![
        Rule::new(true, "LTPA2 token", Colour::Red, LTPA2_PATTERN),
        Rule::new(true, "JWT token", Colour::Orange, JWT_PATTERN),
        Rule::new(true, "PASETO token", Colour::Green, PASETO_PATTERN),
    ]
}
