//! UCI (Universal Chess Interface) protocol library.
//!
//! This crate provides the wire vocabulary a GUI-side analysis controller
//! needs to talk to a UCI engine: commands it sends and messages it reads.
//!
//! # Commands (GUI to engine)
//!
//! - `uci` / `isready` - Handshake
//! - `setoption name <name> value <value>` - Configure options such as `MultiPV`
//! - `position fen <fen> [moves <move>...]` - Set position
//! - `go [depth <d>] [movetime <ms>] [infinite]` - Start search
//! - `stop` - Stop search
//! - `quit` - Exit engine
//!
//! # Messages (engine to GUI)
//!
//! - `id name <name>`, `uciok`, `readyok`
//! - `info ... depth <d> ... score (cp <n>|mate <n>) ... multipv <k> ... pv <moves>`
//! - `bestmove <move> [ponder <move>]` - Terminal line of a search

mod command;
mod info;

pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, InfoBuilder, Score, ScoreBound};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: Option<String>, author: Option<String> },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Best move found; terminates a search.
    BestMove { mv: String, ponder: Option<String> },
}

impl EngineMessage {
    /// Parse a line of engine output.
    ///
    /// Returns `None` for lines that are not part of the protocol subset
    /// (banners, `option` declarations, blank lines).
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next()? {
            "uciok" => Some(EngineMessage::UciOk),
            "readyok" => Some(EngineMessage::ReadyOk),
            "info" => EngineInfo::parse(line).map(EngineMessage::Info),
            "bestmove" => {
                let mv = parts.next()?.to_string();
                let ponder = match parts.next() {
                    Some("ponder") => parts.next().map(str::to_string),
                    _ => None,
                };
                Some(EngineMessage::BestMove { mv, ponder })
            }
            "id" => {
                let rest = |prefix: &str| line.strip_prefix(prefix).map(|s| s.trim().to_string());
                match parts.next()? {
                    "name" => Some(EngineMessage::Id {
                        name: rest("id name"),
                        author: None,
                    }),
                    "author" => Some(EngineMessage::Id {
                        name: None,
                        author: rest("id author"),
                    }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Format message for output.
    pub fn to_uci(&self) -> String {
        match self {
            EngineMessage::Id { name, author } => {
                let mut parts = Vec::new();
                if let Some(n) = name {
                    parts.push(format!("id name {}", n));
                }
                if let Some(a) = author {
                    parts.push(format!("id author {}", a));
                }
                parts.join("\n")
            }
            EngineMessage::UciOk => "uciok".to_string(),
            EngineMessage::ReadyOk => "readyok".to_string(),
            EngineMessage::Info(info) => info.to_uci(),
            EngineMessage::BestMove { mv, ponder } => match ponder {
                Some(p) => format!("bestmove {} ponder {}", mv, p),
                None => format!("bestmove {}", mv),
            },
        }
    }

    /// Returns true for the terminal line of a search.
    pub fn is_bestmove(&self) -> bool {
        matches!(self, EngineMessage::BestMove { .. })
    }
}
