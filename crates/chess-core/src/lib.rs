//! Core types for chess analysis.
//!
//! This crate provides the small set of board-level types the review
//! engine needs without knowing any move legality:
//! - [`Color`] for the side to move and score perspective
//! - [`Fen`] for validated, immutable position keys

mod color;
mod fen;

pub use color::Color;
pub use fen::{Fen, FenError};
