//! Built-in opening table.
//!
//! Compiled into the library so reviews work without any data files.

use crate::opening::Opening;

/// (ECO, name, PGN prefix)
const BUILTIN: &[(&str, &str, &str)] = &[
    // 1. e4
    ("B00", "King's Pawn Game", "1. e4"),
    ("C20", "Open Game", "1. e4 e5"),
    ("C40", "King's Knight Opening", "1. e4 e5 2. Nf3"),
    ("C44", "King's Pawn Game: Knight's Defense", "1. e4 e5 2. Nf3 Nc6"),
    ("C60", "Ruy Lopez", "1. e4 e5 2. Nf3 Nc6 3. Bb5"),
    ("C68", "Ruy Lopez: Morphy Defense", "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6"),
    ("C65", "Ruy Lopez: Berlin Defense", "1. e4 e5 2. Nf3 Nc6 3. Bb5 Nf6"),
    ("C50", "Italian Game", "1. e4 e5 2. Nf3 Nc6 3. Bc4"),
    ("C50", "Italian Game: Giuoco Piano", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5"),
    ("C55", "Italian Game: Two Knights Defense", "1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6"),
    ("C45", "Scotch Game", "1. e4 e5 2. Nf3 Nc6 3. d4"),
    ("C46", "Four Knights Game", "1. e4 e5 2. Nf3 Nc6 3. Nc3 Nf6"),
    ("C42", "Petrov's Defense", "1. e4 e5 2. Nf3 Nf6"),
    ("C41", "Philidor Defense", "1. e4 e5 2. Nf3 d6"),
    ("C23", "Bishop's Opening", "1. e4 e5 2. Bc4"),
    ("C25", "Vienna Game", "1. e4 e5 2. Nc3"),
    ("C30", "King's Gambit", "1. e4 e5 2. f4"),
    ("C33", "King's Gambit Accepted", "1. e4 e5 2. f4 exf4"),
    ("B20", "Sicilian Defense", "1. e4 c5"),
    ("B27", "Sicilian Defense: Open", "1. e4 c5 2. Nf3"),
    ("B50", "Sicilian Defense: Modern Variations", "1. e4 c5 2. Nf3 d6"),
    ("B90", "Sicilian Defense: Najdorf Variation", "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6"),
    ("B70", "Sicilian Defense: Dragon Variation", "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 g6"),
    ("B22", "Sicilian Defense: Alapin Variation", "1. e4 c5 2. c3"),
    ("B23", "Sicilian Defense: Closed", "1. e4 c5 2. Nc3"),
    ("C00", "French Defense", "1. e4 e6"),
    ("C01", "French Defense: Exchange Variation", "1. e4 e6 2. d4 d5 3. exd5"),
    ("C02", "French Defense: Advance Variation", "1. e4 e6 2. d4 d5 3. e5"),
    ("B10", "Caro-Kann Defense", "1. e4 c6"),
    ("B12", "Caro-Kann Defense: Advance Variation", "1. e4 c6 2. d4 d5 3. e5"),
    ("B01", "Scandinavian Defense", "1. e4 d5"),
    ("B07", "Pirc Defense", "1. e4 d6"),
    ("B06", "Modern Defense", "1. e4 g6"),
    ("B02", "Alekhine's Defense", "1. e4 Nf6"),
    // 1. d4
    ("A40", "Queen's Pawn Game", "1. d4"),
    ("D00", "Queen's Pawn Game: Closed", "1. d4 d5"),
    ("D06", "Queen's Gambit", "1. d4 d5 2. c4"),
    ("D20", "Queen's Gambit Accepted", "1. d4 d5 2. c4 dxc4"),
    ("D30", "Queen's Gambit Declined", "1. d4 d5 2. c4 e6"),
    ("D10", "Slav Defense", "1. d4 d5 2. c4 c6"),
    ("D02", "London System", "1. d4 d5 2. Bf4"),
    ("A45", "Indian Defense", "1. d4 Nf6"),
    ("E60", "King's Indian Defense", "1. d4 Nf6 2. c4 g6"),
    ("D80", "Grunfeld Defense", "1. d4 Nf6 2. c4 g6 3. Nc3 d5"),
    ("E20", "Nimzo-Indian Defense", "1. d4 Nf6 2. c4 e6 3. Nc3 Bb4"),
    ("E12", "Queen's Indian Defense", "1. d4 Nf6 2. c4 e6 3. Nf3 b6"),
    ("A80", "Dutch Defense", "1. d4 f5"),
    // Flank openings
    ("A10", "English Opening", "1. c4"),
    ("A20", "English Opening: King's English", "1. c4 e5"),
    ("A04", "Zukertort Opening", "1. Nf3"),
    ("A05", "Zukertort Opening: Reti", "1. Nf3 d5 2. c4"),
    ("A01", "Nimzo-Larsen Attack", "1. b3"),
    ("A00", "Polish Opening", "1. b4"),
    ("A02", "Bird's Opening", "1. f4"),
];

/// Returns the built-in openings in table order (not yet length-sorted).
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    BUILTIN
        .iter()
        .map(|&(eco, name, pgn)| Opening::new(name, pgn).with_eco(eco))
        .collect()
}
