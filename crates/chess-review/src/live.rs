//! Continuous analysis of the position being viewed.
//!
//! Entering a position stops whatever the engine was doing and clears the
//! displayed evaluation. With continuous analysis on, an infinite search
//! is then started and its best line is reported as it deepens.

use chess_core::Fen;
use serde::Serialize;
use uci::EngineMessage;

use crate::engine::{EngineClient, EngineError};
use crate::extractor::LineState;
use crate::presenter::ReviewPresenter;

/// Live evaluation of one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveSnapshot {
    pub fen: Fen,
    /// Best line so far; fields are replaced as newer values arrive.
    pub line: LineState,
}

impl LiveSnapshot {
    fn empty(fen: Fen) -> Self {
        Self {
            fen,
            line: LineState::default(),
        }
    }
}

/// Live analysis bound to the viewed position.
#[derive(Debug)]
pub struct LiveSession {
    continuous: bool,
    snapshot: Option<LiveSnapshot>,
    /// An infinite search for `snapshot.fen` is outstanding.
    analyzing: bool,
}

impl LiveSession {
    pub fn new(continuous: bool) -> Self {
        Self {
            continuous,
            snapshot: None,
            analyzing: false,
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn snapshot(&self) -> Option<&LiveSnapshot> {
        self.snapshot.as_ref()
    }

    /// Switches to a new position.
    ///
    /// No search is started while `review_running` is set.
    pub async fn enter_position<P>(
        &mut self,
        client: &mut EngineClient,
        fen: Fen,
        review_running: bool,
        presenter: &mut P,
    ) -> Result<(), EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        self.halt(client).await?;
        self.snapshot = Some(LiveSnapshot::empty(fen));
        presenter.live_cleared();
        if self.continuous && !review_running {
            self.start(client).await?;
        }
        Ok(())
    }

    /// Turns continuous analysis on or off.
    ///
    /// Turning it off stops the search but keeps the displayed evaluation.
    pub async fn set_continuous(
        &mut self,
        client: &mut EngineClient,
        enabled: bool,
        review_running: bool,
    ) -> Result<(), EngineError> {
        self.continuous = enabled;
        if enabled {
            if !review_running {
                self.resume(client).await?;
            }
        } else {
            self.halt(client).await?;
        }
        Ok(())
    }

    /// Stops the live search, keeping the displayed evaluation.
    pub async fn halt(&mut self, client: &mut EngineClient) -> Result<(), EngineError> {
        client.stop().await?;
        self.analyzing = false;
        Ok(())
    }

    /// Restarts analysis of the current position if continuous analysis is
    /// on and nothing is running.
    pub async fn resume(&mut self, client: &mut EngineClient) -> Result<(), EngineError> {
        if self.continuous && !self.analyzing && self.snapshot.is_some() {
            self.start(client).await?;
        }
        Ok(())
    }

    async fn start(&mut self, client: &mut EngineClient) -> Result<(), EngineError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        client.stop().await?;
        client.set_multipv(1).await?;
        client.start_infinite(&snapshot.fen).await?;
        self.analyzing = true;
        tracing::debug!("live analysis of {}", snapshot.fen);
        Ok(())
    }

    /// Applies all engine output received so far without waiting.
    ///
    /// Returns true if the snapshot changed.
    pub fn pump<P>(&mut self, client: &mut EngineClient, presenter: &mut P) -> Result<bool, EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        let mut changed = false;
        for message in client.drain_messages()? {
            changed |= self.apply(&message);
        }
        if changed {
            if let Some(snapshot) = &self.snapshot {
                presenter.live_evaluation(snapshot);
            }
        }
        Ok(changed)
    }

    /// Waits for the next engine message that changes the snapshot.
    ///
    /// Returns false at once if no live search is outstanding, or when the
    /// search ends without a further update.
    pub async fn wait_update<P>(
        &mut self,
        client: &mut EngineClient,
        presenter: &mut P,
    ) -> Result<bool, EngineError>
    where
        P: ReviewPresenter + ?Sized,
    {
        while self.analyzing {
            let message = client.next_message().await?;
            if self.apply(&message) {
                if let Some(snapshot) = &self.snapshot {
                    presenter.live_evaluation(snapshot);
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn apply(&mut self, message: &EngineMessage) -> bool {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return false;
        };
        match message {
            EngineMessage::Info(info) if info.multipv.unwrap_or(1) == 1 => {
                let before = snapshot.line.clone();
                snapshot.line.absorb(info, snapshot.fen.side_to_move());
                snapshot.line != before
            }
            EngineMessage::BestMove { .. } => {
                self.analyzing = false;
                false
            }
            _ => false,
        }
    }
}
