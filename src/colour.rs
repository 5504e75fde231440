//! Rule colours and their mapping onto the host's highlight vocabulary
//!
//! Rules carry a [`Colour`] owned by the data model. The host tool marks
//! requests with a [`HighlightColor`]; [`Colour::to_highlight`] is the only
//! bridge between the two.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Logical colour assigned to a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Colour {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Pink,
    Magenta,
    Gray,
    None,
}

impl Colour {
    /// Every colour, in the order an editor should offer them
    pub const ALL: [Colour; 10] = [
        Colour::Red,
        Colour::Orange,
        Colour::Yellow,
        Colour::Green,
        Colour::Cyan,
        Colour::Blue,
        Colour::Pink,
        Colour::Magenta,
        Colour::Gray,
        Colour::None,
    ];

    /// Upper-case name used in the persisted encoding
    pub fn name(&self) -> &'static str {
        match self {
            Colour::Red => "RED",
            Colour::Orange => "ORANGE",
            Colour::Yellow => "YELLOW",
            Colour::Green => "GREEN",
            Colour::Cyan => "CYAN",
            Colour::Blue => "BLUE",
            Colour::Pink => "PINK",
            Colour::Magenta => "MAGENTA",
            Colour::Gray => "GRAY",
            Colour::None => "NONE",
        }
    }

    /// Resolve a colour name, falling back when it is unknown
    pub fn resolve(name: &str, fallback: Colour) -> Colour {
        Self::from_name(name).unwrap_or(fallback)
    }

    /// Case-insensitive, whitespace-trimmed lookup
    pub fn from_name(name: &str) -> Option<Colour> {
        let wanted = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .or_else(|| {
                // "grey" is accepted as an alias
                wanted.eq_ignore_ascii_case("grey").then_some(Colour::Gray)
            })
    }

    /// Map onto the host's highlight colour
    pub fn to_highlight(self) -> HighlightColor {
        match self {
            Colour::Red => HighlightColor::Red,
            Colour::Orange => HighlightColor::Orange,
            Colour::Yellow => HighlightColor::Yellow,
            Colour::Green => HighlightColor::Green,
            Colour::Cyan => HighlightColor::Cyan,
            Colour::Blue => HighlightColor::Blue,
            Colour::Pink => HighlightColor::Pink,
            Colour::Magenta => HighlightColor::Magenta,
            Colour::Gray => HighlightColor::Gray,
            Colour::None => HighlightColor::None,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown names decode as [`Colour::Gray`] instead of failing the whole document
impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(resolve(name.as_deref(), Colour::Gray))
    }
}

/// Resolve an optional colour setting, treating a missing value like an unknown one
pub fn resolve(name: Option<&str>, fallback: Colour) -> Colour {
    name.map_or(fallback, |n| Colour::resolve(n, fallback))
}

/// Highlight colours understood by the intercepting host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    None,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Pink,
    Magenta,
    Gray,
}
