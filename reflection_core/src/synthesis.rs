//! Synthesis moments - records of several thoughts merging into one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use thought_store::ThoughtId;

/// Unique identifier for synthesis moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynthesisId(pub Uuid);

impl SynthesisId {
    /// Create a new random synthesis ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SynthesisId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SynthesisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record of two or more source thoughts merging into a derived result.
///
/// Created once per detected merge, never mutated, retained indefinitely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisMoment {
    pub id: SynthesisId,

    /// The prior thoughts that fed the merge; always at least two.
    pub source_ids: Vec<ThoughtId>,

    /// The newly ingested thought the sources merged into.
    pub result_id: ThoughtId,

    /// Mean strength of the contributing connections.
    pub emergence_score: f32,

    /// Summed strength of the contributing connections, clamped to [0, 1].
    pub resonance: f32,

    pub created_at: DateTime<Utc>,
}

impl SynthesisMoment {
    /// Build a synthesis moment from the contributing edge strengths.
    /// Returns `None` when fewer than two sources contributed.
    pub fn from_contributions(
        result_id: ThoughtId,
        contributions: &[(ThoughtId, f32)],
    ) -> Option<Self> {
        if contributions.len() < 2 {
            return None;
        }
        let sum: f32 = contributions.iter().map(|(_, s)| s).sum();
        Some(Self {
            id: SynthesisId::new(),
            source_ids: contributions.iter().map(|(id, _)| *id).collect(),
            result_id,
            emergence_score: sum / contributions.len() as f32,
            resonance: sum.clamp(0.0, 1.0),
            created_at: Utc::now(),
        })
    }
}
