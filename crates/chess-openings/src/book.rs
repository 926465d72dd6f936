//! Opening book storage and lookup.

use std::path::Path;

use thiserror::Error;

use crate::builtin::builtin_openings;
use crate::opening::Opening;

/// Errors that can occur when loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the opening book file.
    #[error("failed to read opening book: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// An entry has an empty PGN prefix, which would match every game.
    #[error("opening '{0}' has an empty PGN prefix")]
    EmptyPrefix(String),
}

/// A static table of named openings, ordered longest PGN prefix first.
///
/// The ordering is established once at construction; lookups are linear
/// scans that return the first (most specific) hit.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    openings: Vec<Opening>,
}

impl OpeningBook {
    /// Creates a book from the given openings, sorting them longest-first.
    #[must_use]
    pub fn new(mut openings: Vec<Opening>) -> Self {
        // Stable sort keeps table order among equal-length prefixes.
        openings.sort_by(|a, b| b.pgn.len().cmp(&a.pgn.len()));
        Self { openings }
    }

    /// The built-in table compiled into the library.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_openings())
    }

    /// Parses a JSON array of `{ "name", "pgn", "eco"? }` objects.
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        let openings: Vec<Opening> = serde_json::from_str(json)?;
        if let Some(empty) = openings.iter().find(|o| o.pgn.trim().is_empty()) {
            return Err(BookError::EmptyPrefix(empty.name.clone()));
        }
        Ok(Self::new(openings))
    }

    /// Loads a JSON opening book from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Returns the number of openings in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.openings.len()
    }

    /// Returns true if the book contains no openings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    /// Returns all openings, longest prefix first.
    #[must_use]
    pub fn all(&self) -> &[Opening] {
        &self.openings
    }

    /// Finds the opening whose line ends exactly at `pgn`.
    ///
    /// This is the lookup used to classify a move as book theory: the
    /// running PGN must start with the prefix and must not be longer than it.
    #[must_use]
    pub fn theory_match(&self, pgn: &str) -> Option<&Opening> {
        self.openings.iter().find(|o| o.ends_at(pgn))
    }

    /// Finds the most specific opening that `pgn` has passed through.
    ///
    /// Used to display the opening name during play; the game may have
    /// left the book since.
    #[must_use]
    pub fn opening_for(&self, pgn: &str) -> Option<&Opening> {
        self.openings.iter().find(|o| o.is_prefix_of(pgn))
    }
}
