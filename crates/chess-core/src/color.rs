//! Player color representation.

use serde::{Deserialize, Serialize};

/// Represents the two players in chess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the side that plays the given 0-based ply from the start position.
    #[inline]
    pub const fn of_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Multiplier that converts a score from this side's point of view
    /// into White's point of view (+1 for White, -1 for Black).
    #[inline]
    pub const fn perspective(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Parses the FEN active-color field.
    pub fn from_fen_char(c: &str) -> Option<Self> {
        match c {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns the FEN active-color character.
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn opposite_color() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn color_index() {
        assert_eq!(Color::White.index(), 0);
        assert_eq!(Color::Black.index(), 1);
    }

    #[test]
    fn ply_parity() {
        assert_eq!(Color::of_ply(0), Color::White);
        assert_eq!(Color::of_ply(1), Color::Black);
        assert_eq!(Color::of_ply(4), Color::White);
    }

    #[test]
    fn fen_char_roundtrip() {
        assert_eq!(Color::from_fen_char("w"), Some(Color::White));
        assert_eq!(Color::from_fen_char("b"), Some(Color::Black));
        assert_eq!(Color::from_fen_char("x"), None);
        assert_eq!(Color::Black.fen_char(), 'b');
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Color::White), "White");
        assert_eq!(format!("{}", Color::Black), "Black");
    }

    proptest! {
        #[test]
        fn perspective_is_an_involution(score in -20_000i32..20_000) {
            for color in [Color::White, Color::Black] {
                prop_assert_eq!(score * color.perspective() * color.perspective(), score);
            }
        }

        #[test]
        fn opposite_flips_perspective(ply in 0usize..1_000) {
            let side = Color::of_ply(ply);
            prop_assert_eq!(side.opposite(), Color::of_ply(ply + 1));
            prop_assert_eq!(side.perspective(), -side.opposite().perspective());
        }
    }
}
