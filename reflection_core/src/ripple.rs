//! Ripple tracing - bounded breadth-first influence propagation.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use thought_store::{ThoughtId, ThoughtStore};

use crate::graph::ConnectionGraph;

/// One hop-distance layer of a ripple trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    /// Hop distance from the origin, starting at 1.
    pub distance: usize,

    /// Thoughts first reached at this distance, with their contributed
    /// resonance.
    pub entries: Vec<WaveEntry>,
}

/// A single thought's contribution to a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveEntry {
    pub thought_id: ThoughtId,
    /// The thought's base resonance attenuated by `1 / distance`.
    pub resonance: f32,
}

impl Wave {
    /// Summed resonance of this wave.
    pub fn resonance(&self) -> f32 {
        self.entries.iter().map(|e| e.resonance).sum()
    }
}

/// The full result of one ripple trace.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RippleReport {
    pub waves: Vec<Wave>,
    /// Sum of all wave resonances across all distances.
    pub total_impact: f32,
}

/// Trace ripples outward from `origin_text` through the connection graph.
///
/// Breadth-first: the visited set is seeded with the origin, so no node is
/// ever counted twice and cycles terminate by construction. Runs in
/// O(visited nodes + traversed edges).
///
/// An origin absent from the corpus yields an empty report rather than an
/// error; the traced thought may be hypothetical.
pub fn trace_ripples<S: ThoughtStore>(
    store: &S,
    graph: &ConnectionGraph,
    origin_text: &str,
    max_distance: usize,
) -> RippleReport {
    let Some(origin) = store.find_by_text(origin_text) else {
        debug!("ripple origin not in corpus: '{}'", origin_text);
        return RippleReport::default();
    };

    let mut visited: HashSet<ThoughtId> = HashSet::new();
    visited.insert(origin.id);

    let mut frontier = vec![origin.id];
    let mut waves = Vec::new();
    let mut total_impact = 0.0;

    for distance in 1..=max_distance {
        let mut next_frontier = Vec::new();
        let mut entries = Vec::new();

        for node in &frontier {
            for connection in graph.neighbors(*node) {
                if !visited.insert(connection.target) {
                    continue;
                }
                let Some(target) = store.get(connection.target) else {
                    continue;
                };
                let resonance = target.base_resonance() / distance as f32;
                total_impact += resonance;
                entries.push(WaveEntry {
                    thought_id: connection.target,
                    resonance,
                });
                next_frontier.push(connection.target);
            }
        }

        if entries.is_empty() {
            break;
        }
        waves.push(Wave { distance, entries });
        frontier = next_frontier;
    }

    debug!(
        "ripple from {} reached {} waves, impact {:.3}",
        origin.id,
        waves.len(),
        total_impact
    );
    RippleReport {
        waves,
        total_impact,
    }
}
