//! Store abstraction and the in-memory corpus implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::StoreError;
use crate::thought::{Thought, ThoughtId};

/// Persistence seam for thought records.
///
/// The engine only ever talks to the corpus through this trait, so the
/// backing implementation (in-memory, relational, flat files) is
/// interchangeable. Queries return thoughts in creation order unless stated
/// otherwise.
pub trait ThoughtStore {
    /// Persist a new thought, returning its id.
    fn create(&mut self, thought: Thought) -> Result<ThoughtId, StoreError>;

    /// Look up a thought by id.
    fn get(&self, id: ThoughtId) -> Option<&Thought>;

    /// Check whether an id exists in the corpus.
    fn contains(&self, id: ThoughtId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve free text to a stored thought: exact case-insensitive match
    /// first, otherwise the most recent thought containing the text.
    fn find_by_text(&self, text: &str) -> Option<&Thought>;

    /// All thoughts whose text contains the keyword (case-insensitive),
    /// in creation order. When `before` is given, only thoughts created
    /// strictly earlier are returned.
    fn query_by_keyword(&self, keyword: &str, before: Option<DateTime<Utc>>) -> Vec<&Thought>;

    /// All thoughts with `start <= created_at <= end`, in creation order.
    fn query_by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Thought>;

    /// Write a thought's evolution stage. A stage never decreases; attempts
    /// to lower it are rejected.
    fn update_stage(&mut self, id: ThoughtId, stage: u32) -> Result<(), StoreError>;

    /// The `n` most recent thoughts, newest first.
    fn recent(&self, n: usize) -> Vec<&Thought>;

    /// Every thought in creation order.
    fn all(&self) -> Vec<&Thought>;

    /// Number of thoughts in the corpus.
    fn len(&self) -> usize;

    /// Whether the corpus is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory, insertion-ordered thought store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryStore {
    /// All thoughts by id.
    thoughts: HashMap<ThoughtId, Thought>,

    /// Creation order of ids.
    order: Vec<ThoughtId>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ordered(&self) -> impl Iterator<Item = &Thought> {
        self.order.iter().filter_map(|id| self.thoughts.get(id))
    }
}

impl ThoughtStore for MemoryStore {
    fn create(&mut self, thought: Thought) -> Result<ThoughtId, StoreError> {
        let id = thought.id;
        if self.thoughts.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.order.push(id);
        self.thoughts.insert(id, thought);
        Ok(id)
    }

    fn get(&self, id: ThoughtId) -> Option<&Thought> {
        self.thoughts.get(&id)
    }

    fn find_by_text(&self, text: &str) -> Option<&Thought> {
        let needle = text.to_lowercase();
        if let Some(exact) = self
            .ordered()
            .find(|t| t.text.to_lowercase() == needle)
        {
            return Some(exact);
        }
        // Fall back to the most recent thought that contains the text.
        self.ordered()
            .filter(|t| t.text.to_lowercase().contains(&needle))
            .last()
    }

    fn query_by_keyword(&self, keyword: &str, before: Option<DateTime<Utc>>) -> Vec<&Thought> {
        self.ordered()
            .filter(|t| t.contains_keyword(keyword))
            .filter(|t| before.map_or(true, |cutoff| t.created_at < cutoff))
            .collect()
    }

    fn query_by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Thought> {
        self.ordered()
            .filter(|t| t.created_at >= start && t.created_at <= end)
            .collect()
    }

    fn update_stage(&mut self, id: ThoughtId, stage: u32) -> Result<(), StoreError> {
        let thought = self.thoughts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if stage < thought.stage {
            return Err(StoreError::StageRegression {
                id,
                current: thought.stage,
                requested: stage,
            });
        }
        thought.stage = stage;
        Ok(())
    }

    fn recent(&self, n: usize) -> Vec<&Thought> {
        self.order
            .iter()
            .rev()
            .take(n)
            .filter_map(|id| self.thoughts.get(id))
            .collect()
    }

    fn all(&self) -> Vec<&Thought> {
        self.ordered().collect()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(base: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        base + Duration::minutes(minutes)
    }

    #[test]
    fn test_create_and_get() {
        let mut store = MemoryStore::new();
        let id = store
            .create(Thought::new("the river keeps moving"))
            .unwrap();

        assert!(store.contains(id));
        assert_eq!(store.get(id).unwrap().text, "the river keeps moving");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = MemoryStore::new();
        let thought = Thought::new("once");
        let copy = thought.clone();

        store.create(thought).unwrap();
        assert!(matches!(
            store.create(copy),
            Err(StoreError::DuplicateId(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_by_text_prefers_exact_match() {
        let mut store = MemoryStore::new();
        store.create(Thought::new("change is hard")).unwrap();
        let exact = store.create(Thought::new("change")).unwrap();

        assert_eq!(store.find_by_text("Change").unwrap().id, exact);
    }

    #[test]
    fn test_find_by_text_falls_back_to_substring() {
        let mut store = MemoryStore::new();
        store.create(Thought::new("learning to let go")).unwrap();
        let newer = store.create(Thought::new("still learning")).unwrap();

        assert_eq!(store.find_by_text("learning").unwrap().id, newer);
        assert!(store.find_by_text("absent").is_none());
    }

    #[test]
    fn test_query_by_keyword_respects_cutoff() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        store
            .create(Thought::new("growth takes time").with_created_at(at(base, 0)))
            .unwrap();
        store
            .create(Thought::new("growth again").with_created_at(at(base, 10)))
            .unwrap();

        assert_eq!(store.query_by_keyword("growth", None).len(), 2);
        assert_eq!(
            store.query_by_keyword("growth", Some(at(base, 5))).len(),
            1
        );
        // Strictly before: the cutoff itself is excluded.
        assert_eq!(
            store.query_by_keyword("growth", Some(at(base, 0))).len(),
            0
        );
    }

    #[test]
    fn test_query_by_time_range() {
        let base = Utc::now();
        let mut store = MemoryStore::new();
        for m in [0, 30, 90] {
            store
                .create(Thought::new(format!("entry {m}")).with_created_at(at(base, m)))
                .unwrap();
        }

        let inside = store.query_by_time_range(at(base, 0), at(base, 60));
        assert_eq!(inside.len(), 2);
    }

    #[test]
    fn test_update_stage_never_decreases() {
        let mut store = MemoryStore::new();
        let id = store.create(Thought::new("a thread")).unwrap();

        store.update_stage(id, 3).unwrap();
        assert_eq!(store.get(id).unwrap().stage, 3);

        let err = store.update_stage(id, 2).unwrap_err();
        assert!(matches!(err, StoreError::StageRegression { .. }));
        assert_eq!(store.get(id).unwrap().stage, 3);
    }

    #[test]
    fn test_update_stage_unknown_id() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.update_stage(ThoughtId::nil(), 2),
            Err(StoreError::NotFound(ThoughtId::nil()))
        );
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut store = MemoryStore::new();
        let a = store.create(Thought::new("first")).unwrap();
        let b = store.create(Thought::new("second")).unwrap();
        let c = store.create(Thought::new("third")).unwrap();

        let recent = store.recent(2);
        assert_eq!(recent[0].id, c);
        assert_eq!(recent[1].id, b);
        assert_eq!(store.all().first().unwrap().id, a);
    }
}
