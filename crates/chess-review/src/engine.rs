//! Request/response client over the engine channel.
//!
//! The engine holds one search at a time. [`EngineClient`] is the single
//! owner of the channel: every new search is preceded by a `stop` of the
//! previous one, and output belonging to a stopped search is discarded
//! until its `bestmove` has gone by, so it can never resolve a later
//! request.

use std::time::Duration;

use chess_core::Fen;
use thiserror::Error;
use uci::{EngineMessage, GoOptions, GuiCommand};

use crate::evaluation::Evaluation;
use crate::extractor::EvalAccumulator;
use crate::transport::{EngineChannel, TransportError};

/// Errors that can occur while talking to the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The transport failed; fatal to the session.
    #[error("Engine transport failed: {0}")]
    Transport(#[from] TransportError),
    /// The UCI handshake did not complete.
    #[error("Engine initialization failed: no {expected} within {after:?}")]
    InitFailed {
        expected: &'static str,
        after: Duration,
    },
    /// An evaluation request did not complete in time.
    #[error("Evaluation of {fen} timed out after {after:?}")]
    Timeout { fen: String, after: Duration },
}

/// One evaluation request.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    pub fen: Fen,
    pub limit: GoOptions,
    /// Number of ranked lines (multi-PV).
    pub lines: u32,
    pub timeout: Duration,
}

impl EvalRequest {
    /// A bounded-depth request for `lines` ranked lines.
    pub fn depth(fen: Fen, depth: u32, lines: u32, timeout: Duration) -> Self {
        Self {
            fen,
            limit: GoOptions::depth(depth),
            lines,
            timeout,
        }
    }
}

/// Single-owner client for one UCI engine.
pub struct EngineClient {
    channel: EngineChannel,
    name: Option<String>,
    /// Current value of the engine's `MultiPV` option.
    multipv: u32,
    /// A search was started and its `bestmove` not yet seen.
    searching: bool,
    /// Stopped searches whose `bestmove` is still to be discarded.
    stale_searches: usize,
}

impl EngineClient {
    pub fn new(channel: EngineChannel) -> Self {
        Self {
            channel,
            name: None,
            multipv: 1,
            searching: false,
            stale_searches: 0,
        }
    }

    /// Engine name reported during the handshake.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current `MultiPV` setting.
    pub fn multipv(&self) -> u32 {
        self.multipv
    }

    /// True while a search is outstanding.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Performs the `uci`/`uciok` and `isready`/`readyok` handshake.
    pub async fn handshake(&mut self, timeout: Duration) -> Result<(), EngineError> {
        self.channel.send(&GuiCommand::Uci).await?;
        let waited = tokio::time::timeout(timeout, async {
            loop {
                match self.next_message().await? {
                    EngineMessage::Id { name: Some(n), .. } => self.name = Some(n),
                    EngineMessage::UciOk => return Ok::<_, EngineError>(()),
                    _ => {}
                }
            }
        })
        .await;
        waited.map_err(|_| EngineError::InitFailed {
            expected: "uciok",
            after: timeout,
        })??;

        self.sync(timeout).await?;
        tracing::info!(
            "engine ready: {}",
            self.name.as_deref().unwrap_or("Unknown Engine")
        );
        Ok(())
    }

    /// Sends `isready` and waits for `readyok`.
    pub async fn sync(&mut self, timeout: Duration) -> Result<(), EngineError> {
        self.channel.send(&GuiCommand::IsReady).await?;
        let waited = tokio::time::timeout(timeout, async {
            loop {
                if self.next_message().await? == EngineMessage::ReadyOk {
                    return Ok::<_, EngineError>(());
                }
            }
        })
        .await;
        waited.map_err(|_| EngineError::InitFailed {
            expected: "readyok",
            after: timeout,
        })?
    }

    /// Sets the engine's `MultiPV` option.
    pub async fn set_multipv(&mut self, lines: u32) -> Result<(), EngineError> {
        let lines = lines.max(1);
        if lines != self.multipv {
            self.channel.send(&GuiCommand::multipv(lines)).await?;
            self.multipv = lines;
        }
        Ok(())
    }

    /// Stops the outstanding search, if any. Fire-and-forget.
    pub async fn stop(&mut self) -> Result<(), EngineError> {
        if self.searching {
            self.channel.send(&GuiCommand::Stop).await?;
            self.searching = false;
            self.stale_searches += 1;
        }
        Ok(())
    }

    /// Starts a search that runs until stopped.
    pub async fn start_infinite(&mut self, fen: &Fen) -> Result<(), EngineError> {
        self.start(fen, GoOptions::infinite()).await
    }

    async fn start(&mut self, fen: &Fen, limit: GoOptions) -> Result<(), EngineError> {
        self.stop().await?;
        self.channel
            .send(&GuiCommand::position_fen(fen.as_str()))
            .await?;
        self.channel.send(&GuiCommand::Go(limit)).await?;
        self.searching = true;
        Ok(())
    }

    /// Runs one evaluation request to completion.
    ///
    /// Returns one [`Evaluation`] per requested line, best first. If no
    /// `bestmove` arrives within the request's timeout the search is stopped
    /// and [`EngineError::Timeout`] names the position.
    pub async fn evaluate(&mut self, request: &EvalRequest) -> Result<Vec<Evaluation>, EngineError> {
        // Options must not reach an engine that is still searching.
        self.stop().await?;
        self.set_multipv(request.lines).await?;
        self.start(&request.fen, request.limit.clone()).await?;

        let mut acc = EvalAccumulator::new(request.fen.side_to_move(), request.lines as usize);
        match tokio::time::timeout(request.timeout, self.complete(&mut acc)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("evaluation timed out after {:?}: {}", request.timeout, request.fen);
                self.stop().await?;
                Err(EngineError::Timeout {
                    fen: request.fen.to_string(),
                    after: request.timeout,
                })
            }
        }
    }

    async fn complete(&mut self, acc: &mut EvalAccumulator) -> Result<Vec<Evaluation>, EngineError> {
        loop {
            let message = self.next_message().await?;
            if let Some(evaluations) = acc.update(&message) {
                return Ok(evaluations);
            }
        }
    }

    /// Waits for the next message of the current search.
    pub async fn next_message(&mut self) -> Result<EngineMessage, EngineError> {
        loop {
            let line = self.channel.recv().await?;
            if let Some(message) = self.admit(&line) {
                return Ok(message);
            }
        }
    }

    /// Drains already-buffered messages of the current search without waiting.
    pub fn drain_messages(&mut self) -> Result<Vec<EngineMessage>, EngineError> {
        let mut messages = Vec::new();
        while let Some(line) = self.channel.try_recv()? {
            if let Some(message) = self.admit(&line) {
                messages.push(message);
            }
        }
        Ok(messages)
    }

    /// Filters one raw line: unparseable lines and output of stopped
    /// searches are dropped.
    fn admit(&mut self, line: &str) -> Option<EngineMessage> {
        let message = EngineMessage::parse(line)?;
        if self.stale_searches > 0 {
            if message.is_bestmove() {
                self.stale_searches -= 1;
            }
            tracing::trace!("discarding stale engine output: {}", line);
            return None;
        }
        if message.is_bestmove() {
            self.searching = false;
        }
        Some(message)
    }
}
