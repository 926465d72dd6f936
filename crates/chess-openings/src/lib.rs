//! Chess opening table and lookup.
//!
//! Openings are keyed by the PGN movetext that reaches them
//! (`"1. e4 e5 2. Nf3 Nc6 3. Bb5"`). An [`OpeningBook`] keeps its entries
//! sorted longest-prefix-first so the most specific name always wins.

pub mod book;
pub mod builtin;
pub mod opening;

pub use book::{BookError, OpeningBook};
pub use opening::Opening;
