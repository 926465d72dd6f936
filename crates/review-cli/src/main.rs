//! Chess Review - post-game review and position analysis from the terminal.
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chess_core::Fen;
use chess_openings::OpeningBook;
use chess_review::{AnalysisController, LogPresenter, RecordedGame, ReviewConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chess-review")]
#[command(about = "Classifies the moves of finished chess games with a UCI engine")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON opening book to use instead of the built-in table
    #[arg(long, global = true)]
    book: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a recorded game (JSON array of { "san", "fen" } plies)
    Review {
        game: PathBuf,
        /// Search depth per position
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        depth: Option<u32>,
    },
    /// Analyze a position continuously for a fixed time
    Eval {
        fen: String,
        /// Analysis time in milliseconds
        #[arg(short, long, default_value = "2000")]
        millis: u64,
    },
    /// Print the opening a PGN movetext is in
    Opening { pgn: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReviewConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReviewConfig::load().context("failed to load review.toml")?,
    };
    let book = match &cli.book {
        Some(path) => OpeningBook::load(path)
            .with_context(|| format!("failed to load opening book {}", path.display()))?,
        None => OpeningBook::builtin(),
    };

    match cli.command {
        Commands::Review { game, depth } => {
            if let Some(depth) = depth {
                config.review.depth = depth;
            }
            let game = RecordedGame::load(&game)
                .with_context(|| format!("failed to load game {}", game.display()))?;

            let (mut controller, process) = AnalysisController::connect(&config, book).await?;
            let result = controller.start_review(&game, &mut LogPresenter).await;
            process.shutdown().await;

            if let Some(report) = result? {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Eval { fen, millis } => {
            let fen = Fen::parse(&fen).context("invalid FEN")?;
            config.live.continuous = true;

            let (mut controller, process) = AnalysisController::connect(&config, book).await?;
            controller.view_position(fen, &mut LogPresenter).await?;

            let deadline = tokio::time::sleep(Duration::from_millis(millis));
            tokio::pin!(deadline);
            let mut presenter = LogPresenter;
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    updated = controller.wait_live(&mut presenter) => {
                        if !updated? {
                            break;
                        }
                    }
                }
            }
            controller.exit_analysis().await?;

            if let Some(snapshot) = controller.live_snapshot() {
                println!("{}", serde_json::to_string_pretty(snapshot)?);
            }
            process.shutdown().await;
        }
        Commands::Opening { pgn } => {
            let opening = book.opening_for(&pgn);
            tracing::debug!("{} openings in book", book.len());
            println!("{}", serde_json::to_string_pretty(&opening)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_review_with_depth_and_config() {
        let cli = Cli::try_parse_from([
            "chess-review",
            "review",
            "game.json",
            "--depth",
            "18",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Review { game, depth } => {
                assert_eq!(game, PathBuf::from("game.json"));
                assert_eq!(depth, Some(18));
            }
            _ => panic!("Expected review command"),
        }
    }

    #[test]
    fn eval_defaults_to_two_seconds() {
        let cli = Cli::try_parse_from(["chess-review", "eval", Fen::STARTPOS]).unwrap();
        match cli.command {
            Commands::Eval { fen, millis } => {
                assert_eq!(fen, Fen::STARTPOS);
                assert_eq!(millis, 2000);
            }
            _ => panic!("Expected eval command"),
        }
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(Cli::try_parse_from(["chess-review", "review", "game.json", "--depth", "0"]).is_err());
        assert!(Cli::try_parse_from(["chess-review", "review", "game.json", "-d", "1"]).is_ok());
    }

    #[test]
    fn opening_requires_pgn() {
        assert!(Cli::try_parse_from(["chess-review", "opening"]).is_err());
        assert!(Cli::try_parse_from(["chess-review", "opening", "1. e4 c5"]).is_ok());
    }
}
