//! Chess position evaluation types.

use chess_core::Color;
use serde::{Deserialize, Serialize};
use uci::Score;

/// Magnitude used for forced-mate scores.
///
/// Mates are stored as a large finite number so that subtracting two
/// evaluations (centipawn loss) stays well defined.
pub const MATE_SCORE: i32 = 10_000;

/// One engine line for a position, fully normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Centipawn score from White's perspective; mates are `±MATE_SCORE`.
    pub score: i32,
    /// Search depth reached.
    pub depth: u32,
    /// Nodes searched.
    pub nodes: u64,
    /// Principal variation, as reported by the engine.
    pub pv: Vec<String>,
}

impl Evaluation {
    /// An evaluation carrying only a score.
    pub fn from_score(score: i32) -> Self {
        Self {
            score,
            depth: 0,
            nodes: 0,
            pv: Vec::new(),
        }
    }

    /// True if the score encodes a forced mate.
    pub fn is_mate(&self) -> bool {
        self.score.abs() >= MATE_SCORE
    }
}

/// Converts an engine score into White-perspective centipawns.
///
/// Engines report scores for the side to move. `mate 0` means the side to
/// move is already mated.
pub fn normalize_score(score: Score, side_to_move: Color) -> i32 {
    let relative = match score {
        Score::Cp(cp) => cp,
        Score::Mate(n) if n > 0 => MATE_SCORE,
        Score::Mate(_) => -MATE_SCORE,
    };
    relative * side_to_move.perspective()
}

/// Renders a White-perspective score for display: `+0.35`, `-1.20`, `#+`, `#-`.
pub fn format_score(score: i32) -> String {
    if score >= MATE_SCORE {
        "#+".to_string()
    } else if score <= -MATE_SCORE {
        "#-".to_string()
    } else {
        format!("{:+.2}", f64::from(score) / 100.0)
    }
}
