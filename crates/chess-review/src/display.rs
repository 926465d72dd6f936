//! Display metadata for move quality tiers.
//!
//! Pure lookup data for presentation layers; nothing in the review logic
//! reads it.

use serde::Serialize;

use crate::quality::MoveQuality;

/// How a tier is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    pub label: &'static str,
    /// Short annotation glyph.
    pub icon: &'static str,
    /// Severity color as a CSS hex string.
    pub color: &'static str,
}

const BLUNDER: DisplayMeta = DisplayMeta { label: "Blunder", icon: "??", color: "#ca3431" };
const MISTAKE: DisplayMeta = DisplayMeta { label: "Mistake", icon: "?", color: "#e6912c" };
const INACCURACY: DisplayMeta = DisplayMeta { label: "Inaccuracy", icon: "?!", color: "#f7c045" };
const OKAY: DisplayMeta = DisplayMeta { label: "Okay", icon: "", color: "#97af8b" };
const BEST: DisplayMeta = DisplayMeta { label: "Best", icon: "★", color: "#81b64c" };
const EXCELLENT: DisplayMeta = DisplayMeta { label: "Excellent", icon: "!", color: "#96bc4b" };
const BRILLIANT: DisplayMeta = DisplayMeta { label: "Brilliant", icon: "!!", color: "#26c2a3" };
const THEORY: DisplayMeta = DisplayMeta { label: "Theory", icon: "📖", color: "#a88865" };

/// Looks up the display metadata for a tier.
pub fn display_meta(quality: MoveQuality) -> &'static DisplayMeta {
    match quality {
        MoveQuality::Blunder => &BLUNDER,
        MoveQuality::Mistake => &MISTAKE,
        MoveQuality::Inaccuracy => &INACCURACY,
        MoveQuality::Okay => &OKAY,
        MoveQuality::Best => &BEST,
        MoveQuality::Excellent => &EXCELLENT,
        MoveQuality::Brilliant => &BRILLIANT,
        MoveQuality::Theory => &THEORY,
    }
}
