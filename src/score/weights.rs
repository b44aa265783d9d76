//! Fixed linear affinity weighting.
//!
//! Rosters may carry raw interaction counts instead of precomputed
//! scores; this collapses them into a single affinity number. Higher
//! means closer. Only relative order matters downstream, so the weights
//! are plain tuning constants, not calibrated probabilities.

use serde::Deserialize;

/// Weight per direct message exchanged.
const W_MESSAGES: f32 = 1.0;
/// Replies show sustained attention, weighted above plain messages.
const W_REPLIES: f32 = 2.5;
/// Reactions are cheap, weighted below everything else.
const W_REACTIONS: f32 = 0.75;
/// Weight per mention of the contact by the user (or vice versa).
const W_MENTIONS: f32 = 2.0;
/// Calls are the strongest signal.
const W_CALLS: f32 = 4.0;

/// Raw interaction counts between the user and one contact.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct InteractionCounts {
    #[serde(default)]
    pub messages: u32,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub reactions: u32,
    #[serde(default)]
    pub mentions: u32,
    #[serde(default)]
    pub calls: u32,
}

/// Collapse counts into one affinity score via the fixed linear sum.
pub fn affinity_score(counts: &InteractionCounts) -> f32 {
    counts.messages as f32 * W_MESSAGES
        + counts.replies as f32 * W_REPLIES
        + counts.reactions as f32 * W_REACTIONS
        + counts.mentions as f32 * W_MENTIONS
        + counts.calls as f32 * W_CALLS
}
