//! Evolution tracking - stage assignment over conceptual ancestors.
//!
//! A thought's stage is write-once: it is computed here at ingestion time,
//! persisted through the store, and never revised afterwards.

use chrono::{DateTime, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

use thought_store::{ThoughtId, ThoughtStore};

/// The result of staging one new thought against the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageAssignment {
    /// 1 + the highest ancestor stage (1 when no ancestor exists).
    pub stage: u32,

    /// One ancestor per keyword that had a prior occurrence.
    pub ancestors: Vec<ThoughtId>,
}

impl StageAssignment {
    /// Whether the new thought continues an existing conceptual thread.
    pub fn growth_detected(&self) -> bool {
        self.stage > 1
    }
}

/// Compute the evolution stage of a thought with the given keywords, created
/// at `before`, against everything already in the store.
///
/// For each keyword the best ancestor is the prior thought containing it
/// with the highest stage, most recent timestamp as tiebreak.
pub fn stage_of<S: ThoughtStore>(
    store: &S,
    keywords: &[String],
    before: DateTime<Utc>,
) -> StageAssignment {
    let mut ancestors: Vec<ThoughtId> = Vec::new();
    let mut max_stage = 0;

    for keyword in keywords {
        let candidates = store.query_by_keyword(keyword, Some(before));
        let best = candidates
            .iter()
            .max_by_key(|t| (t.stage, t.created_at));

        if let Some(ancestor) = best {
            trace!(
                "keyword '{}' has ancestor {} at stage {}",
                keyword,
                ancestor.id,
                ancestor.stage
            );
            if !ancestors.contains(&ancestor.id) {
                ancestors.push(ancestor.id);
            }
            max_stage = max_stage.max(ancestor.stage);
        }
    }

    StageAssignment {
        stage: max_stage + 1,
        ancestors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use thought_store::{MemoryStore, Thought};

    fn seed(store: &mut MemoryStore, text: &str, stage: u32, at: DateTime<Utc>) -> ThoughtId {
        let id = store
            .create(Thought::new(text).with_created_at(at))
            .unwrap();
        store.update_stage(id, stage).unwrap();
        id
    }

    #[test]
    fn test_first_occurrence_is_stage_one() {
        let store = MemoryStore::new();
        let assignment = stage_of(&store, &["change".to_string()], Utc::now());
        assert_eq!(assignment.stage, 1);
        assert!(assignment.ancestors.is_empty());
        assert!(!assignment.growth_detected());
    }

    #[test]
    fn test_stage_builds_on_ancestor() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        let ancestor = seed(&mut store, "change is coming", 2, base);

        let assignment = stage_of(
            &store,
            &["change".to_string()],
            base + Duration::hours(1),
        );

        assert_eq!(assignment.stage, 3);
        assert_eq!(assignment.ancestors, vec![ancestor]);
        assert!(assignment.growth_detected());
    }

    #[test]
    fn test_tiebreak_prefers_highest_stage_then_recency() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        seed(&mut store, "growth hurts", 1, base);
        let high = seed(&mut store, "growth again", 3, base + Duration::hours(1));

        let assignment = stage_of(
            &store,
            &["growth".to_string()],
            base + Duration::hours(2),
        );

        assert_eq!(assignment.stage, 4);
        assert_eq!(assignment.ancestors, vec![high]);
    }

    #[test]
    fn test_equal_stages_fall_back_to_recency() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        seed(&mut store, "growth hurts", 2, base);
        let recent = seed(&mut store, "growth again", 2, base + Duration::hours(1));

        let assignment = stage_of(
            &store,
            &["growth".to_string()],
            base + Duration::hours(2),
        );

        assert_eq!(assignment.stage, 3);
        assert_eq!(assignment.ancestors, vec![recent]);
    }

    #[test]
    fn test_only_prior_thoughts_count() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        seed(&mut store, "later change", 5, base + Duration::hours(2));

        let assignment = stage_of(&store, &["change".to_string()], base);
        assert_eq!(assignment.stage, 1);
        assert!(assignment.ancestors.is_empty());
    }

    #[test]
    fn test_multiple_keywords_take_max() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        seed(&mut store, "quiet morning", 1, base);
        seed(&mut store, "restless night", 4, base);

        let assignment = stage_of(
            &store,
            &["quiet".to_string(), "restless".to_string()],
            base + Duration::hours(1),
        );

        assert_eq!(assignment.stage, 5);
        assert_eq!(assignment.ancestors.len(), 2);
    }
}
