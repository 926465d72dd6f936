//! Post-game review and live analysis with a UCI engine.
//!
//! This crate replays finished games against an engine such as Stockfish,
//! classifies every move into a quality tier and keeps a live evaluation
//! of whatever position is being viewed.
//!
//! # Overview
//!
//! - [`EngineProcess`] / [`EngineChannel`] - Duplex line transport to the engine
//! - [`EngineClient`] - Request/response evaluations with timeouts
//! - [`EvalAccumulator`] - Folds `info`/`bestmove` lines into [`Evaluation`]s
//! - [`Classifier`] - Maps centipawn loss, book and criticality to a [`MoveQuality`]
//! - [`ReviewPipeline`] - Sequential per-ply review of a [`GameSource`]
//! - [`LiveSession`] - Infinite search bound to the viewed position
//! - [`AnalysisController`] - Shares one engine between review and live analysis
//!
//! # Example
//!
//! ```ignore
//! use chess_review::{AnalysisController, LogPresenter, RecordedGame, ReviewConfig};
//! use chess_openings::OpeningBook;
//!
//! let config = ReviewConfig::load()?;
//! let (mut controller, process) = AnalysisController::connect(&config, OpeningBook::builtin()).await?;
//! let game = RecordedGame::load("game.json")?;
//! let report = controller.start_review(&game, &mut LogPresenter).await?;
//! process.shutdown().await;
//! ```

pub mod config;
pub mod controller;
pub mod display;
pub mod engine;
pub mod evaluation;
pub mod extractor;
pub mod game;
pub mod live;
pub mod presenter;
pub mod quality;
pub mod review;
pub mod transport;

pub use config::{ConfigError, LiveSettings, ReviewConfig, ReviewSettings};
pub use controller::AnalysisController;
pub use display::{display_meta, DisplayMeta};
pub use engine::{EngineClient, EngineError, EvalRequest};
pub use evaluation::{format_score, normalize_score, Evaluation, MATE_SCORE};
pub use extractor::{EvalAccumulator, LineState};
pub use game::{movetext, GameError, GameSource, MoveRecord, RecordedGame, RecordedPly};
pub use live::{LiveSession, LiveSnapshot};
pub use presenter::{LogPresenter, NullPresenter, ReviewPresenter};
pub use quality::{centipawn_loss, is_critical, Classifier, MoveQuality, Thresholds};
pub use review::{ReviewEntry, ReviewError, ReviewPipeline, ReviewReport, ReviewState, SideSummary};
pub use transport::{EngineChannel, EngineEndpoint, EngineProcess, TransportError};
