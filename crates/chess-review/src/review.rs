//! Post-game review pipeline.
//!
//! Replays a finished game one ply at a time. For each position before a
//! move the engine is asked for its two best lines at a fixed depth; the
//! move's centipawn loss is measured against the best line carried over
//! from the previous ply, the position is flagged critical when the two
//! lines diverge sharply, and the move is classified.
//!
//! Requests are strictly sequential. A timeout aborts the whole run and
//! discards its entries.

use std::time::Duration;

use chess_openings::OpeningBook;
use serde::Serialize;
use thiserror::Error;

use crate::config::ReviewSettings;
use crate::engine::{EngineClient, EngineError, EvalRequest};
use crate::game::{GameSource, MoveRecord};
use crate::presenter::ReviewPresenter;
use crate::quality::{centipawn_loss, is_critical, Classifier, MoveQuality};

/// Errors that abort a review run.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A position did not finish evaluating in time.
    #[error("Evaluation of {fen} timed out after {after:?}")]
    Timeout { fen: String, after: Duration },
    /// The engine failed while evaluating a position.
    #[error("Engine failed while evaluating {fen}: {source}")]
    Engine {
        fen: String,
        #[source]
        source: EngineError,
    },
    /// The engine failed before any position was requested.
    #[error("Engine failed: {0}")]
    Interrupted(#[from] EngineError),
    /// The game source has no position for a ply.
    #[error("No position before ply {ply}")]
    MissingPosition { ply: usize },
}

impl ReviewError {
    fn at(fen: &str, error: EngineError) -> Self {
        match error {
            EngineError::Timeout { after, .. } => ReviewError::Timeout {
                fen: fen.to_string(),
                after,
            },
            source => ReviewError::Engine {
                fen: fen.to_string(),
                source,
            },
        }
    }

    /// The position being evaluated when the run failed, if any.
    pub fn fen(&self) -> Option<&str> {
        match self {
            ReviewError::Timeout { fen, .. } | ReviewError::Engine { fen, .. } => Some(fen),
            _ => None,
        }
    }
}

/// Lifecycle of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ReviewState {
    Idle,
    Running { completed: usize, total: usize },
    Complete,
    Failed { fen: Option<String> },
}

impl ReviewState {
    pub fn is_running(&self) -> bool {
        matches!(self, ReviewState::Running { .. })
    }
}

/// Review of one played move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    #[serde(flatten)]
    pub record: MoveRecord,
    pub quality: MoveQuality,
    /// White-perspective best-line score of the position before the move.
    pub score: i32,
    /// Centipawn loss relative to the previous ply's best line.
    pub loss: i32,
    pub critical: bool,
}

/// Per-side statistics over a finished review.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideSummary {
    pub moves: u32,
    pub brilliant: u32,
    pub best: u32,
    pub excellent: u32,
    pub okay: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub blunders: u32,
    pub theory: u32,
    /// Mean of the non-negative losses of engine-judged moves.
    pub average_loss: f64,
}

impl SideSummary {
    /// Aggregates the given entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ReviewEntry>) -> Self {
        let mut summary = SideSummary::default();
        let mut total_loss: i64 = 0;
        let mut judged: u32 = 0;

        for entry in entries {
            summary.moves += 1;
            match entry.quality {
                MoveQuality::Brilliant => summary.brilliant += 1,
                MoveQuality::Best => summary.best += 1,
                MoveQuality::Excellent => summary.excellent += 1,
                MoveQuality::Okay => summary.okay += 1,
                MoveQuality::Inaccuracy => summary.inaccuracies += 1,
                MoveQuality::Mistake => summary.mistakes += 1,
                MoveQuality::Blunder => summary.blunders += 1,
                MoveQuality::Theory => summary.theory += 1,
            }
            if entry.quality != MoveQuality::Theory {
                total_loss += i64::from(entry.loss.max(0));
                judged += 1;
            }
        }

        if judged > 0 {
            summary.average_loss = total_loss as f64 / f64::from(judged);
        }
        summary
    }
}

/// Result of a completed review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    /// One entry per played move, in ply order.
    pub entries: Vec<ReviewEntry>,
    /// Evaluation curve for charting: the prior, then each entry's score.
    pub curve: Vec<i32>,
    pub white: SideSummary,
    pub black: SideSummary,
}

impl ReviewReport {
    fn new(entries: Vec<ReviewEntry>, prior: i32) -> Self {
        let mut curve = Vec::with_capacity(entries.len() + 1);
        curve.push(prior);
        curve.extend(entries.iter().map(|e| e.score));

        let white = SideSummary::from_entries(entries.iter().step_by(2));
        let black = SideSummary::from_entries(entries.iter().skip(1).step_by(2));
        Self {
            entries,
            curve,
            white,
            black,
        }
    }
}

/// Runs reviews of finished games, one at a time.
pub struct ReviewPipeline {
    settings: ReviewSettings,
    state: ReviewState,
    entries: Vec<ReviewEntry>,
}

impl ReviewPipeline {
    pub fn new(settings: ReviewSettings) -> Self {
        Self {
            settings,
            state: ReviewState::Idle,
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    /// Entries appended so far by the current or last successful run.
    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }

    /// Discards all entries and returns to `Idle`.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.state = ReviewState::Idle;
    }

    /// Reviews a finished game.
    ///
    /// Returns `Ok(None)` without touching the engine if a run is already
    /// in progress. A run whose future is dropped stays `Running` until
    /// [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Any failure aborts the run: the state becomes `Failed`, entries are
    /// discarded and the presenter is told. The pipeline can be started
    /// again afterwards.
    pub async fn run<G, P>(
        &mut self,
        client: &mut EngineClient,
        game: &G,
        book: &OpeningBook,
        presenter: &mut P,
    ) -> Result<Option<ReviewReport>, ReviewError>
    where
        G: GameSource + ?Sized,
        P: ReviewPresenter + ?Sized,
    {
        if self.state.is_running() {
            tracing::debug!("review already running, ignoring start");
            return Ok(None);
        }

        let total = game.moves().len();
        self.entries.clear();
        self.state = ReviewState::Running {
            completed: 0,
            total,
        };
        tracing::info!("starting review of {} plies at depth {}", total, self.settings.depth);
        presenter.review_started(total);

        match self.replay(client, game, book, presenter).await {
            Ok(()) => {
                let report = ReviewReport::new(self.entries.clone(), self.settings.prior[0]);
                self.state = ReviewState::Complete;
                tracing::info!("review complete");
                presenter.review_complete(&report);
                Ok(Some(report))
            }
            Err(err) => {
                self.entries.clear();
                self.state = ReviewState::Failed {
                    fen: err.fen().map(str::to_string),
                };
                tracing::warn!("review aborted: {}", err);
                presenter.review_failed(&err);
                Err(err)
            }
        }
    }

    async fn replay<G, P>(
        &mut self,
        client: &mut EngineClient,
        game: &G,
        book: &OpeningBook,
        presenter: &mut P,
    ) -> Result<(), ReviewError>
    where
        G: GameSource + ?Sized,
        P: ReviewPresenter + ?Sized,
    {
        let moves = game.moves();
        let total = moves.len();
        let classifier = Classifier::new(book, self.settings.thresholds);
        let mut previous_best = self.settings.prior[0];

        for (ply, record) in moves.iter().enumerate() {
            let fen = game
                .position_before(ply)
                .ok_or(ReviewError::MissingPosition { ply })?;
            let request = EvalRequest::depth(
                fen.clone(),
                self.settings.depth,
                self.settings.lines,
                self.settings.timeout(),
            );

            let evaluated = client.evaluate(&request).await;
            // MultiPV must not leak into unrelated searches, even after a failure.
            let restored = client.set_multipv(1).await;
            let evaluations = evaluated.map_err(|e| ReviewError::at(fen.as_str(), e))?;
            restored.map_err(|e| ReviewError::at(fen.as_str(), e))?;

            let best = evaluations.first().map_or(0, |e| e.score);
            let critical = evaluations
                .get(1)
                .is_some_and(|second| is_critical(best, second.score, self.settings.critical_swing));
            let loss = centipawn_loss(record.side, previous_best, best);
            let pgn = game.pgn_through(ply);
            let quality = classifier.classify(loss, &pgn, critical);
            tracing::debug!(
                "ply {} {}: best {} loss {} critical {} -> {:?}",
                ply,
                record.san,
                best,
                loss,
                critical,
                quality
            );

            let entry = ReviewEntry {
                record: record.clone(),
                quality,
                score: best,
                loss,
                critical,
            };
            self.entries.push(entry);
            self.state = ReviewState::Running {
                completed: self.entries.len(),
                total,
            };
            if let Some(entry) = self.entries.last() {
                presenter.review_progress(entry, self.entries.len(), total);
            }
            previous_best = best;
        }
        Ok(())
    }
}
