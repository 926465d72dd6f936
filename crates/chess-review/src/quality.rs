//! Move quality classification.

use chess_core::Color;
use chess_openings::OpeningBook;
use serde::{Deserialize, Serialize};

/// Classification tier of a played move, worst to best, then book moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveQuality {
    /// Major centipawn loss
    Blunder,
    /// Significant centipawn loss
    Mistake,
    /// Noticeable centipawn loss
    Inaccuracy,
    /// Small centipawn loss
    Okay,
    /// The engine's choice, or as good as it
    Best,
    /// Minimal centipawn loss
    Excellent,
    /// The only good move in a critical position
    Brilliant,
    /// A known opening move
    Theory,
}

impl MoveQuality {
    /// All tiers in declaration order.
    pub const ALL: [MoveQuality; 8] = [
        MoveQuality::Blunder,
        MoveQuality::Mistake,
        MoveQuality::Inaccuracy,
        MoveQuality::Okay,
        MoveQuality::Best,
        MoveQuality::Excellent,
        MoveQuality::Brilliant,
        MoveQuality::Theory,
    ];

    /// Ranks engine-judged tiers by how good the move was (higher is better).
    ///
    /// `Theory` is not judged by the engine and has no merit.
    pub fn merit(self) -> Option<u8> {
        match self {
            MoveQuality::Blunder => Some(0),
            MoveQuality::Mistake => Some(1),
            MoveQuality::Inaccuracy => Some(2),
            MoveQuality::Okay => Some(3),
            MoveQuality::Excellent => Some(4),
            MoveQuality::Best => Some(5),
            MoveQuality::Brilliant => Some(6),
            MoveQuality::Theory => None,
        }
    }
}

/// Centipawn-loss thresholds of the classifier ladder.
///
/// A loss strictly greater than a threshold falls into that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub blunder: i32,
    pub mistake: i32,
    pub inaccuracy: i32,
    pub okay: i32,
    pub excellent: i32,
    /// A critical-position move losing less than this is brilliant.
    pub brilliant_max_loss: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            blunder: 150,
            mistake: 80,
            inaccuracy: 30,
            okay: 10,
            excellent: 2,
            brilliant_max_loss: 10,
        }
    }
}

impl Thresholds {
    /// Classifies a move on engine terms alone.
    ///
    /// Negative losses (the move beat the previous estimate) land in `Best`.
    pub fn classify_loss(&self, loss: i32, is_critical: bool) -> MoveQuality {
        if is_critical && loss < self.brilliant_max_loss {
            MoveQuality::Brilliant
        } else if loss > self.blunder {
            MoveQuality::Blunder
        } else if loss > self.mistake {
            MoveQuality::Mistake
        } else if loss > self.inaccuracy {
            MoveQuality::Inaccuracy
        } else if loss > self.okay {
            MoveQuality::Okay
        } else if loss > self.excellent {
            MoveQuality::Excellent
        } else {
            MoveQuality::Best
        }
    }
}

/// Classifies moves against an opening book and a threshold ladder.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    book: &'a OpeningBook,
    thresholds: Thresholds,
}

impl<'a> Classifier<'a> {
    pub fn new(book: &'a OpeningBook, thresholds: Thresholds) -> Self {
        Self { book, thresholds }
    }

    /// Classifies one move.
    ///
    /// `pgn` is the game's movetext up to and including the move. A move
    /// ending exactly on a book line is `Theory` regardless of its loss.
    pub fn classify(&self, loss: i32, pgn: &str, is_critical: bool) -> MoveQuality {
        if self.book.theory_match(pgn).is_some() {
            return MoveQuality::Theory;
        }
        self.thresholds.classify_loss(loss, is_critical)
    }
}

/// Centipawn loss of a move given White-perspective best-line scores.
///
/// `previous_best` is the best-line score carried from the prior ply and
/// `current_best` the best-line score at the position before the move.
pub fn centipawn_loss(mover: Color, previous_best: i32, current_best: i32) -> i32 {
    match mover {
        Color::White => previous_best - current_best,
        Color::Black => current_best - previous_best,
    }
}

/// True if switching from the best to the second-best line swings the
/// evaluation by more than `swing` centipawns.
pub fn is_critical(best: i32, second: i32, swing: i32) -> bool {
    (i64::from(best) - i64::from(second)).abs() > i64::from(swing)
}
