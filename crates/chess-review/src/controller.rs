//! Arbitration of the single engine between live analysis and review.

use chess_core::Fen;
use chess_openings::OpeningBook;

use crate::config::ReviewConfig;
use crate::engine::{EngineClient, EngineError};
use crate::game::GameSource;
use crate::live::{LiveSession, LiveSnapshot};
use crate::presenter::ReviewPresenter;
use crate::review::{ReviewEntry, ReviewError, ReviewPipeline, ReviewReport, ReviewState};
use crate::transport::EngineProcess;

/// Owns the engine client and hands it to one consumer at a time.
pub struct AnalysisController {
    client: EngineClient,
    live: LiveSession,
    review: ReviewPipeline,
    book: OpeningBook,
}

impl AnalysisController {
    pub fn new(client: EngineClient, config: &ReviewConfig, book: OpeningBook) -> Self {
        Self {
            client,
            live: LiveSession::new(config.live.continuous),
            review: ReviewPipeline::new(config.review.clone()),
            book,
        }
    }

    /// Spawns the configured engine and completes the UCI handshake.
    pub async fn connect(
        config: &ReviewConfig,
        book: OpeningBook,
    ) -> Result<(Self, EngineProcess), EngineError> {
        let (process, channel) = EngineProcess::spawn(&config.engine)?;
        let mut client = EngineClient::new(channel);
        client.handshake(config.handshake_timeout()).await?;
        Ok((Self::new(client, config, book), process))
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.client.name()
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Display name of the opening the game is in, by loose prefix match.
    pub fn opening_name(&self, pgn: &str) -> Option<&str> {
        self.book.opening_for(pgn).map(|o| o.name.as_str())
    }

    /// Moves the live session to the position the user is viewing.
    pub async fn view_position<P>(&mut self, fen: Fen, presenter: &mut P) -> Result<(), EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        let review_running = self.review.state().is_running();
        self.live
            .enter_position(&mut self.client, fen, review_running, presenter)
            .await
    }

    pub async fn set_continuous_analysis(&mut self, enabled: bool) -> Result<(), EngineError> {
        let review_running = self.review.state().is_running();
        self.live
            .set_continuous(&mut self.client, enabled, review_running)
            .await
    }

    /// Applies buffered live output without waiting.
    pub fn pump_live<P>(&mut self, presenter: &mut P) -> Result<bool, EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        self.live.pump(&mut self.client, presenter)
    }

    /// Waits for the next live update.
    pub async fn wait_live<P>(&mut self, presenter: &mut P) -> Result<bool, EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        self.live.wait_update(&mut self.client, presenter).await
    }

    pub fn live_snapshot(&self) -> Option<&LiveSnapshot> {
        self.live.snapshot()
    }

    /// Reviews a finished game.
    ///
    /// Live analysis is halted before the first request and resumed once
    /// the review completes. A failure to resume is logged and does not
    /// discard the finished report. Returns `Ok(None)` if a review is
    /// already running.
    pub async fn start_review<G, P>(
        &mut self,
        game: &G,
        presenter: &mut P,
    ) -> Result<Option<ReviewReport>, ReviewError>
    where
        G: GameSource + ?Sized,
        P: ReviewPresenter + ?Sized,
    {
        if self.review.state().is_running() {
            return Ok(None);
        }
        self.live.halt(&mut self.client).await?;

        let report = self
            .review
            .run(&mut self.client, game, &self.book, presenter)
            .await?;
        if let Err(err) = self.live.resume(&mut self.client).await {
            tracing::warn!("live analysis not resumed after review: {}", err);
        }
        Ok(report)
    }

    pub fn review_state(&self) -> &ReviewState {
        self.review.state()
    }

    pub fn review_entries(&self) -> &[ReviewEntry] {
        self.review.entries()
    }

    /// Leaves analysis mode: the review is discarded and live search stops.
    pub async fn exit_analysis(&mut self) -> Result<(), EngineError> {
        self.review.reset();
        self.live.halt(&mut self.client).await
    }
}
