//! UCI command formatting and parsing.

use crate::UciError;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option.
    SetOption { name: String, value: Option<String> },
    /// Set up position.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
    /// Unknown command (for forward compatibility).
    Unknown(String),
}

/// Options for the `go` command.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search to this depth.
    pub depth: Option<u32>,
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Search indefinitely until `stop`.
    pub infinite: bool,
}

impl GoOptions {
    /// Bounded-depth search.
    pub fn depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Fixed-time search.
    pub fn movetime(ms: u64) -> Self {
        Self {
            movetime: Some(ms),
            ..Self::default()
        }
    }

    /// Unbounded search, terminated only by `stop`.
    pub fn infinite() -> Self {
        Self {
            infinite: true,
            ..Self::default()
        }
    }
}

impl GuiCommand {
    /// `setoption name MultiPV value <lines>`.
    pub fn multipv(lines: u32) -> Self {
        GuiCommand::SetOption {
            name: "MultiPV".to_string(),
            value: Some(lines.to_string()),
        }
    }

    /// `position fen <fen>`.
    pub fn position_fen(fen: impl Into<String>) -> Self {
        GuiCommand::Position {
            fen: Some(fen.into()),
            moves: Vec::new(),
        }
    }

    /// Format as a UCI command line (without trailing newline).
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {} value {}", name, v),
                None => format!("setoption name {}", name),
            },
            GuiCommand::Position { fen, moves } => {
                let mut cmd = match fen {
                    Some(f) => format!("position fen {}", f),
                    None => "position startpos".to_string(),
                };
                if !moves.is_empty() {
                    cmd.push_str(" moves ");
                    cmd.push_str(&moves.join(" "));
                }
                cmd
            }
            GuiCommand::Go(opts) => {
                let mut parts = vec!["go".to_string()];
                if let Some(d) = opts.depth {
                    parts.push(format!("depth {}", d));
                }
                if let Some(t) = opts.movetime {
                    parts.push(format!("movetime {}", t));
                }
                if opts.infinite {
                    parts.push("infinite".to_string());
                }
                parts.join(" ")
            }
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
            GuiCommand::Unknown(s) => s.clone(),
        }
    }

    /// Parse a UCI command string.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let cmd = parts.next().unwrap_or("");

        match cmd {
            "uci" => Ok(GuiCommand::Uci),
            "isready" => Ok(GuiCommand::IsReady),
            "stop" => Ok(GuiCommand::Stop),
            "quit" => Ok(GuiCommand::Quit),
            "setoption" => Self::parse_setoption(parts),
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            "" => Ok(GuiCommand::Unknown(String::new())),
            _ => Ok(GuiCommand::Unknown(input.to_string())),
        }
    }

    fn parse_setoption<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let parts: Vec<&str> = parts.collect();
        if parts.first() != Some(&"name") {
            return Err(UciError::InvalidCommand(format!(
                "setoption {}",
                parts.join(" ")
            )));
        }

        // Option names may contain spaces, so split on the "value" keyword.
        let value_idx = parts.iter().position(|&p| p == "value");
        let name_end = value_idx.unwrap_or(parts.len());
        let name = parts[1..name_end].join(" ");
        if name.is_empty() {
            return Err(UciError::InvalidCommand("setoption without name".to_string()));
        }
        let value = value_idx.map(|i| parts[i + 1..].join(" "));

        Ok(GuiCommand::SetOption { name, value })
    }

    fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let fen = match parts.next() {
            Some("startpos") => None,
            Some("fen") => {
                let mut fen_parts = Vec::new();
                for part in parts.by_ref() {
                    if part == "moves" {
                        break;
                    }
                    fen_parts.push(part);
                }
                if fen_parts.is_empty() {
                    return Err(UciError::ParseError("Missing FEN".to_string()));
                }
                let moves = parts.map(str::to_string).collect();
                return Ok(GuiCommand::Position {
                    fen: Some(fen_parts.join(" ")),
                    moves,
                });
            }
            Some(other) => {
                return Err(UciError::ParseError(format!(
                    "Expected 'startpos' or 'fen', got '{}'",
                    other
                )));
            }
            None => {
                return Err(UciError::ParseError(
                    "Expected 'startpos' or 'fen'".to_string(),
                ));
            }
        };

        let moves = match parts.next() {
            Some("moves") => parts.map(str::to_string).collect(),
            _ => Vec::new(),
        };

        Ok(GuiCommand::Position { fen, moves })
    }

    fn parse_go<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let mut opts = GoOptions::default();
        let parts: Vec<&str> = parts.collect();
        let mut i = 0;

        while i < parts.len() {
            match parts[i] {
                "movetime" => {
                    i += 1;
                    if i < parts.len() {
                        opts.movetime = parts[i].parse().ok();
                    }
                }
                "depth" => {
                    i += 1;
                    if i < parts.len() {
                        opts.depth = parts[i].parse().ok();
                    }
                }
                "infinite" => {
                    opts.infinite = true;
                }
                _ => {}
            }
            i += 1;
        }

        Ok(GuiCommand::Go(opts))
    }
}
