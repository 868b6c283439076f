//! Pattern discovery - deterministic per-kind pattern extraction plus
//! meta-patterns across kinds.
//!
//! Every score here is derived from the corpus; there is no sampled or
//! randomized scoring anywhere in the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use thought_store::{Affect, ExpressionStyle, Thought, ThoughtId};

use crate::themes::extract_themes;

/// Kinds of discoverable patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Emotional,
    Conceptual,
    Behavioral,
    Temporal,
}

/// One discovered pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub name: String,
    /// Score in [0, 1]; meaning depends on the kind (frequency ratio for
    /// emotional/behavioral/temporal, composite theme depth for conceptual).
    pub score: f32,
    pub occurrence_count: usize,
    pub member_thought_ids: Vec<ThoughtId>,
}

/// A pairing of patterns from different kinds whose member sets overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaPattern {
    pub component_a: String,
    pub component_b: String,
    /// Jaccard overlap of the two member sets.
    pub overlap: f32,
}

/// The result of one discovery pass.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatternReport {
    /// Per-kind pattern lists, each sorted descending by score.
    pub patterns: Vec<Pattern>,
    pub meta_patterns: Vec<MetaPattern>,
}

/// Day-part buckets for temporal patterns.
fn day_part(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=17 => "afternoon",
        18..=22 => "evening",
        _ => "night",
    }
}

/// Discover patterns of the requested kinds with scores at or above
/// `threshold`.
pub fn discover_patterns(
    thoughts: &[&Thought],
    kinds: &[PatternKind],
    threshold: f32,
) -> PatternReport {
    let mut patterns = Vec::new();

    for kind in kinds {
        let mut found = match kind {
            PatternKind::Emotional => emotional_patterns(thoughts),
            PatternKind::Conceptual => conceptual_patterns(thoughts),
            PatternKind::Behavioral => behavioral_patterns(thoughts),
            PatternKind::Temporal => temporal_patterns(thoughts),
        };
        found.retain(|p| p.score >= threshold);
        patterns.extend(found);
    }

    sort_patterns(&mut patterns);
    let meta_patterns = meta_patterns(&patterns, threshold);

    PatternReport {
        patterns,
        meta_patterns,
    }
}

fn sort_patterns(patterns: &mut [Pattern]) {
    patterns.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Affect-tag frequency across the corpus, Neutral excluded.
fn emotional_patterns(thoughts: &[&Thought]) -> Vec<Pattern> {
    if thoughts.is_empty() {
        return Vec::new();
    }
    let total = thoughts.len() as f32;

    let labels = [
        Affect::Joy,
        Affect::Sadness,
        Affect::Anger,
        Affect::Fear,
        Affect::Curiosity,
        Affect::Calm,
        Affect::Hope,
    ];

    labels
        .iter()
        .filter_map(|affect| {
            let members: Vec<ThoughtId> = thoughts
                .iter()
                .filter(|t| t.affect_tags.contains(affect))
                .map(|t| t.id)
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(Pattern {
                kind: PatternKind::Emotional,
                name: affect.as_str().to_string(),
                score: members.len() as f32 / total,
                occurrence_count: members.len(),
                member_thought_ids: members,
            })
        })
        .collect()
}

/// Themes re-expressed as patterns, scored by composite depth.
fn conceptual_patterns(thoughts: &[&Thought]) -> Vec<Pattern> {
    extract_themes(thoughts)
        .into_iter()
        .map(|theme| Pattern {
            kind: PatternKind::Conceptual,
            name: theme.name,
            score: theme.depth,
            occurrence_count: theme.occurrence_count,
            member_thought_ids: theme.member_thought_ids,
        })
        .collect()
}

/// Expression-style distribution.
fn behavioral_patterns(thoughts: &[&Thought]) -> Vec<Pattern> {
    if thoughts.is_empty() {
        return Vec::new();
    }
    let total = thoughts.len() as f32;

    let styles = [
        (ExpressionStyle::Questioning, "questioning"),
        (ExpressionStyle::Affirming, "affirming"),
        (ExpressionStyle::Negating, "negating"),
        (ExpressionStyle::Exploring, "exploring"),
        (ExpressionStyle::Concluding, "concluding"),
        (ExpressionStyle::Neutral, "neutral"),
    ];

    styles
        .iter()
        .filter_map(|(style, name)| {
            let members: Vec<ThoughtId> = thoughts
                .iter()
                .filter(|t| t.expression_style == *style)
                .map(|t| t.id)
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(Pattern {
                kind: PatternKind::Behavioral,
                name: name.to_string(),
                score: members.len() as f32 / total,
                occurrence_count: members.len(),
                member_thought_ids: members,
            })
        })
        .collect()
}

/// Day-part distribution over creation hours.
fn temporal_patterns(thoughts: &[&Thought]) -> Vec<Pattern> {
    use chrono::Timelike;

    if thoughts.is_empty() {
        return Vec::new();
    }
    let total = thoughts.len() as f32;

    ["morning", "afternoon", "evening", "night"]
        .iter()
        .filter_map(|part| {
            let members: Vec<ThoughtId> = thoughts
                .iter()
                .filter(|t| day_part(t.created_at.hour()) == *part)
                .map(|t| t.id)
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(Pattern {
                kind: PatternKind::Temporal,
                name: format!("{part} reflection"),
                score: members.len() as f32 / total,
                occurrence_count: members.len(),
                member_thought_ids: members,
            })
        })
        .collect()
}

/// Cross-kind pairings: the top pattern of each kind is compared against the
/// top pattern of every other kind by member-set overlap.
fn meta_patterns(patterns: &[Pattern], threshold: f32) -> Vec<MetaPattern> {
    let mut tops: Vec<&Pattern> = Vec::new();
    for pattern in patterns {
        if !tops.iter().any(|p| p.kind == pattern.kind) {
            tops.push(pattern);
        }
    }

    let mut meta = Vec::new();
    for i in 0..tops.len() {
        for j in (i + 1)..tops.len() {
            let overlap = member_overlap(
                &tops[i].member_thought_ids,
                &tops[j].member_thought_ids,
            );
            if overlap >= threshold && overlap > 0.0 {
                meta.push(MetaPattern {
                    component_a: tops[i].name.clone(),
                    component_b: tops[j].name.clone(),
                    overlap,
                });
            }
        }
    }
    meta
}

fn member_overlap(a: &[ThoughtId], b: &[ThoughtId]) -> f32 {
    let set_a: HashSet<ThoughtId> = a.iter().copied().collect();
    let set_b: HashSet<ThoughtId> = b.iter().copied().collect();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f32 / union as f32
}
