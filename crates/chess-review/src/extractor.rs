//! Incremental extraction of evaluations from UCI output.
//!
//! Engines stream `info` lines that deepen progressively and finish with a
//! `bestmove` line. An [`EvalAccumulator`] belongs to exactly one request;
//! it folds each line into per-rank state and yields the finished
//! evaluations once the terminal line arrives.

use chess_core::Color;
use serde::Serialize;
use uci::{EngineInfo, EngineMessage, ScoreBound};

use crate::evaluation::{normalize_score, Evaluation};

/// Latest known values for one engine line. Fields missing from an `info`
/// line keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineState {
    /// White-perspective score.
    pub score: Option<i32>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub pv: Vec<String>,
}

impl LineState {
    /// Folds one `info` line into this state.
    pub fn absorb(&mut self, info: &EngineInfo, side_to_move: Color) {
        if let Some(depth) = info.depth {
            self.depth = Some(depth);
        }
        if let Some(nodes) = info.nodes {
            self.nodes = Some(nodes);
        }
        // Bound scores come from a failed aspiration window, not a real value.
        if let (Some(score), ScoreBound::Exact) = (info.score, info.bound) {
            self.score = Some(normalize_score(score, side_to_move));
        }
        if !info.pv.is_empty() {
            self.pv = info.pv.clone();
        }
    }

    fn to_evaluation(&self, fallback_score: i32) -> Evaluation {
        Evaluation {
            score: self.score.unwrap_or(fallback_score),
            depth: self.depth.unwrap_or(0),
            nodes: self.nodes.unwrap_or(0),
            pv: self.pv.clone(),
        }
    }
}

/// Per-request accumulator for a (possibly multi-PV) search.
#[derive(Debug, Clone)]
pub struct EvalAccumulator {
    side_to_move: Color,
    lines: Vec<LineState>,
    best_move: Option<String>,
}

impl EvalAccumulator {
    /// Creates an accumulator for `lines` ranked lines (at least one).
    pub fn new(side_to_move: Color, lines: usize) -> Self {
        Self {
            side_to_move,
            lines: vec![LineState::default(); lines.max(1)],
            best_move: None,
        }
    }

    /// Feeds one engine message.
    ///
    /// Returns the finished evaluations, best line first, when the message
    /// is the terminal `bestmove` line; `None` otherwise.
    pub fn update(&mut self, message: &EngineMessage) -> Option<Vec<Evaluation>> {
        match message {
            EngineMessage::Info(info) => {
                self.absorb(info);
                None
            }
            EngineMessage::BestMove { mv, .. } => {
                self.best_move = Some(mv.clone());
                Some(self.finish())
            }
            _ => None,
        }
    }

    fn absorb(&mut self, info: &EngineInfo) {
        let rank = info.multipv.unwrap_or(1) as usize;
        if rank == 0 {
            return;
        }
        if let Some(line) = self.lines.get_mut(rank - 1) {
            line.absorb(info, self.side_to_move);
        }
    }

    /// Snapshot of the evaluations as they currently stand.
    ///
    /// Ranks that never reported a score take the score of the best rank
    /// that did (e.g. only one legal move exists). If no rank reported a
    /// score at all, the position is scored as level.
    pub fn finish(&self) -> Vec<Evaluation> {
        let fallback = self.lines.iter().find_map(|l| l.score).unwrap_or(0);
        self.lines
            .iter()
            .map(|line| line.to_evaluation(fallback))
            .collect()
    }

    /// The engine's chosen move, once the search has finished.
    pub fn best_move(&self) -> Option<&str> {
        self.best_move.as_deref()
    }

    /// Current state of the line with the given 1-based rank.
    pub fn line(&self, rank: usize) -> Option<&LineState> {
        rank.checked_sub(1).and_then(|i| self.lines.get(i))
    }
}
