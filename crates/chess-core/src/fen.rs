//! FEN (Forsyth-Edwards Notation) position keys.
//!
//! The analysis code never mutates or interprets a board; it only needs a
//! canonical string to hand to the engine and the side to move for score
//! normalization. [`Fen`] validates the string once and is immutable after.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// A validated FEN string used as an engine request key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fen {
    text: String,
    side_to_move: Color,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Returns the starting position.
    pub fn startpos() -> Self {
        Self {
            text: Self::STARTPOS.to_string(),
            side_to_move: Color::White,
        }
    }

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        validate_piece_placement(parts[0])?;

        let side_to_move = Color::from_fen_char(parts[1])
            .ok_or_else(|| FenError::InvalidActiveColor(parts[1].to_string()))?;

        validate_castling(parts[2])?;
        validate_en_passant(parts[3])?;

        parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
        parts[5]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(Self {
            text: parts.join(" "),
            side_to_move,
        })
    }

    /// The side to move in this position.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The canonical FEN text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0;
        for c in rank.chars() {
            if let Some(n) = c.to_digit(10) {
                squares += n;
            } else if "pnbrqkPNBRQK".contains(c) {
                squares += 1;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }

    match castling.chars().find(|c| !"KQkq".contains(*c)) {
        Some(c) => Err(FenError::InvalidCastlingRights(format!(
            "invalid character '{}'",
            c
        ))),
        None => Ok(()),
    }
}

fn validate_en_passant(ep: &str) -> Result<(), FenError> {
    if ep == "-" {
        return Ok(());
    }

    let bytes = ep.as_bytes();
    if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !matches!(bytes[1], b'3' | b'6')
    {
        return Err(FenError::InvalidEnPassantSquare(ep.to_string()));
    }

    Ok(())
}

impl Default for Fen {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fen {
    type Error = FenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fen> for String {
    fn from(fen: Fen) -> Self {
        fen.text
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
