//! Core opening types.

use serde::{Deserialize, Serialize};

/// A named opening identified by the PGN prefix that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The display name of the opening.
    pub name: String,
    /// PGN movetext of the opening line, e.g. `"1. e4 e5 2. Nf3"`.
    pub pgn: String,
    /// The ECO code for this opening (e.g., "B20", "C44"), if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco: Option<String>,
}

impl Opening {
    /// Creates a new opening with the given name and PGN prefix.
    #[must_use]
    pub fn new(name: impl Into<String>, pgn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pgn: pgn.into(),
            eco: None,
        }
    }

    /// Sets the ECO code.
    #[must_use]
    pub fn with_eco(mut self, eco: impl Into<String>) -> Self {
        self.eco = Some(eco.into());
        self
    }

    /// True when `pgn` has reached this opening's line, possibly continuing past it.
    pub fn is_prefix_of(&self, pgn: &str) -> bool {
        pgn.starts_with(&self.pgn)
    }

    /// True when `pgn` ends exactly on this opening's last ply.
    ///
    /// A running PGN that continues past the prefix, or that merely shares
    /// its leading characters mid-move, does not match.
    pub fn ends_at(&self, pgn: &str) -> bool {
        self.is_prefix_of(pgn) && pgn.len() <= self.pgn.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_new() {
        let opening = Opening::new("King's Pawn Game", "1. e4").with_eco("B00");
        assert_eq!(opening.name, "King's Pawn Game");
        assert_eq!(opening.pgn, "1. e4");
        assert_eq!(opening.eco.as_deref(), Some("B00"));
    }

    #[test]
    fn test_prefix_and_exact_boundary() {
        let ruy = Opening::new("Ruy Lopez", "1. e4 e5 2. Nf3 Nc6 3. Bb5");
        assert!(ruy.is_prefix_of("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6"));
        assert!(!ruy.ends_at("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6"));
        assert!(ruy.ends_at("1. e4 e5 2. Nf3 Nc6 3. Bb5"));
        assert!(!ruy.is_prefix_of("1. e4 e5 2. Nf3 Nc6"));
    }

    #[test]
    fn test_deserialize_without_eco() {
        let opening: Opening =
            serde_json::from_str(r#"{"name":"Sicilian Defense","pgn":"1. e4 c5"}"#).unwrap();
        assert_eq!(opening, Opening::new("Sicilian Defense", "1. e4 c5"));
    }
}
