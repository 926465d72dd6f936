//! Callbacks into the presentation layer.
//!
//! The core pushes plain data; it never renders. Every method has a no-op
//! default so a presenter only implements what it displays.

use crate::display::display_meta;
use crate::evaluation::format_score;
use crate::live::LiveSnapshot;
use crate::review::{ReviewEntry, ReviewError, ReviewReport};

/// Receives review and live-analysis updates.
pub trait ReviewPresenter {
    /// A review of `total` plies started.
    fn review_started(&mut self, _total: usize) {}

    /// One more entry was appended; `completed` entries exist so far.
    fn review_progress(&mut self, _entry: &ReviewEntry, _completed: usize, _total: usize) {}

    fn review_complete(&mut self, _report: &ReviewReport) {}

    /// The run was aborted; its entries have been discarded.
    fn review_failed(&mut self, _error: &ReviewError) {}

    /// The live evaluation of the viewed position changed.
    fn live_evaluation(&mut self, _snapshot: &LiveSnapshot) {}

    /// The displayed live evaluation was cleared.
    fn live_cleared(&mut self) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl ReviewPresenter for NullPresenter {}

/// Reports updates through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl ReviewPresenter for LogPresenter {
    fn review_started(&mut self, total: usize) {
        tracing::info!("reviewing {} plies", total);
    }

    fn review_progress(&mut self, entry: &ReviewEntry, completed: usize, total: usize) {
        let meta = display_meta(entry.quality);
        tracing::info!(
            "[{}/{}] {} {} {} ({})",
            completed,
            total,
            entry.record.san,
            meta.icon,
            meta.label,
            format_score(entry.score)
        );
    }

    fn review_complete(&mut self, report: &ReviewReport) {
        tracing::info!(
            "review complete: white avg loss {:.1}, black avg loss {:.1}",
            report.white.average_loss,
            report.black.average_loss
        );
    }

    fn review_failed(&mut self, error: &ReviewError) {
        tracing::error!("review failed: {}", error);
    }

    fn live_evaluation(&mut self, snapshot: &LiveSnapshot) {
        if let Some(score) = snapshot.line.score {
            tracing::debug!(
                "live depth {} {} {}",
                snapshot.line.depth.unwrap_or(0),
                format_score(score),
                snapshot.line.pv.join(" ")
            );
        }
    }
}
