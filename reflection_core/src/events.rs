//! Engine events - synchronous observer notification after mutations commit.

use thought_store::ThoughtId;

use crate::synthesis::SynthesisId;

/// State changes the engine announces to subscribers.
///
/// Observers run synchronously, after the corresponding mutation has
/// committed; they cannot veto or reorder anything.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A thought entered the corpus.
    ThoughtIngested { id: ThoughtId, stage: u32 },

    /// An edge was discovered or re-scored.
    ConnectionDiscovered {
        source: ThoughtId,
        target: ThoughtId,
        strength: f32,
    },

    /// A synthesis moment was recorded.
    SynthesisRecorded {
        id: SynthesisId,
        result: ThoughtId,
        source_count: usize,
    },
}

/// Observer callback type.
pub type Observer = Box<dyn Fn(&EngineEvent)>;

/// A list of observers notified in subscription order.
#[derive(Default)]
pub struct Observers {
    subscribers: Vec<Observer>,
}

impl Observers {
    /// Create an empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Observer) {
        self.subscribers.push(observer);
    }

    /// Notify every observer of an event.
    pub fn notify(&self, event: &EngineEvent) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
