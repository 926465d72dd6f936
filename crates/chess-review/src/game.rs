//! The finished game being reviewed.
//!
//! Move legality is not checked here: the game source is trusted to supply
//! the played moves in order and the position before each of them.

use chess_core::{Color, Fen};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One played move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 0-based ply index; even plies are White's.
    pub ply: usize,
    /// Move in standard algebraic notation.
    pub san: String,
    pub side: Color,
}

impl MoveRecord {
    pub fn new(ply: usize, san: impl Into<String>) -> Self {
        Self {
            ply,
            san: san.into(),
            side: Color::of_ply(ply),
        }
    }
}

/// Supplies a finished game to the review pipeline.
pub trait GameSource {
    /// The played moves, in ply order.
    fn moves(&self) -> &[MoveRecord];

    /// The position before the move at `ply` is played.
    fn position_before(&self, ply: usize) -> Option<&Fen>;

    /// PGN movetext up to and including the move at `ply`.
    fn pgn_through(&self, ply: usize) -> String {
        let moves = self.moves();
        movetext(&moves[..(ply + 1).min(moves.len())])
    }
}

/// Formats moves as PGN movetext: `"1. e4 e5 2. Nf3"`.
pub fn movetext(moves: &[MoveRecord]) -> String {
    let mut text = String::new();
    for (i, mv) in moves.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        if i % 2 == 0 {
            text.push_str(&format!("{}. ", i / 2 + 1));
        }
        text.push_str(&mv.san);
    }
    text
}

/// Errors building a recorded game.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read game file: {0}")]
    Io(#[from] std::io::Error),
    #[error("position before ply {ply} has {found} to move, expected {expected}")]
    SideMismatch {
        ply: usize,
        expected: Color,
        found: Color,
    },
}

/// One ply of a recorded game as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPly {
    pub san: String,
    /// Position before the move.
    pub fen: Fen,
}

/// A finished game held in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordedGame {
    moves: Vec<MoveRecord>,
    positions: Vec<Fen>,
}

impl RecordedGame {
    /// Builds a game from plies in order.
    ///
    /// Each position must have the mover of its ply to move, so White
    /// always starts.
    pub fn new(plies: Vec<RecordedPly>) -> Result<Self, GameError> {
        let mut moves = Vec::with_capacity(plies.len());
        let mut positions = Vec::with_capacity(plies.len());
        for (ply, recorded) in plies.into_iter().enumerate() {
            let record = MoveRecord::new(ply, recorded.san);
            let found = recorded.fen.side_to_move();
            if found != record.side {
                return Err(GameError::SideMismatch {
                    ply,
                    expected: record.side,
                    found,
                });
            }
            moves.push(record);
            positions.push(recorded.fen);
        }
        Ok(Self { moves, positions })
    }

    /// Parses a JSON array of `{ "san", "fen" }` plies.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let plies: Vec<RecordedPly> = serde_json::from_str(json)?;
        Self::new(plies)
    }

    /// Loads a JSON game file.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, GameError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl GameSource for RecordedGame {
    fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    fn position_before(&self, ply: usize) -> Option<&Fen> {
        self.positions.get(ply)
    }
}
