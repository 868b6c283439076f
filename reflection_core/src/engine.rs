//! The reflection engine facade.
//!
//! Ingestion is the single mutating path: it analyzes the text, discovers
//! connections against the recent window, stages the thought, and commits
//! everything at once. Every query operation is read-only over the
//! accumulated corpus and graph.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use thought_store::{Affect, DepthLevel, ExpressionStyle, MemoryStore, Thought, ThoughtId, ThoughtStore};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, Observer, Observers};
use crate::evolution::stage_of;
use crate::graph::{Connection, ConnectionGraph, ConnectionKind};
use crate::lexicon::{classify_expression_style, detect_affect, extract_keywords};
use crate::patterns::{discover_patterns, PatternKind, PatternReport};
use crate::ripple::{trace_ripples, RippleReport};
use crate::similarity::{keyword_overlap, text_similarity};
use crate::synthesis::SynthesisMoment;
use crate::themes::{extract_themes, find_cross_currents, within_timeframe, CrossCurrent, Theme, Timeframe};

/// One edge discovered while ingesting a thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredConnection {
    pub target: ThoughtId,
    pub kind: ConnectionKind,
    pub strength: f32,
}

/// The result of ingesting one thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub thought_id: ThoughtId,
    pub keywords: Vec<String>,
    pub affect_tags: Vec<Affect>,
    pub expression_style: ExpressionStyle,
    pub connections: Vec<DiscoveredConnection>,

    /// Present when evolution tracking was requested.
    pub stage: Option<u32>,
    pub growth_detected: bool,

    /// Deterministic observations derived from the analysis.
    pub insights: Vec<String>,
}

/// Themes active within a time window.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndercurrentReport {
    pub themes: Vec<Theme>,
    pub dominant_theme: Option<String>,
    pub cross_currents: Vec<CrossCurrent>,
}

/// One thought's appearance in an evolution chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEntry {
    pub thought_id: ThoughtId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A connection between two thoughts that both match a traced concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub from: ThoughtId,
    pub to: ThoughtId,
    pub strength: f32,
}

/// How a concept evolved through the corpus, stage by stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionReport {
    pub concept: String,
    pub stages: BTreeMap<u32, Vec<StageEntry>>,
    pub branches: Option<Vec<Branch>>,
}

/// The engine: a thought store, the connection graph over it, and the
/// derivation operations.
pub struct ReflectionEngine<S: ThoughtStore> {
    store: S,
    graph: ConnectionGraph,
    config: EngineConfig,
    observers: Observers,
    syntheses: Vec<SynthesisMoment>,
}

impl ReflectionEngine<MemoryStore> {
    /// Create an engine over a fresh in-memory corpus with default
    /// configuration.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), EngineConfig::default())
    }
}

impl<S: ThoughtStore> ReflectionEngine<S> {
    /// Create an engine over an existing store.
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            graph: ConnectionGraph::new(),
            config,
            observers: Observers::new(),
            syntheses: Vec::new(),
        }
    }

    /// Ingest one thought: analyze, discover connections, stage, commit.
    ///
    /// All reads happen before the first write, so a failure leaves the
    /// corpus untouched.
    pub fn ingest(
        &mut self,
        text: &str,
        depth_level: DepthLevel,
        track_evolution: bool,
    ) -> Result<IngestReport, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyText);
        }

        let keywords = extract_keywords(text);
        let affect_tags = detect_affect(text);
        let expression_style = classify_expression_style(text);

        let thought = Thought::new(text)
            .with_depth(depth_level)
            .with_keywords(keywords.clone())
            .with_affects(affect_tags.clone())
            .with_style(expression_style);
        let id = thought.id;
        let created_at = thought.created_at;

        // Edge discovery against the recent window, read-only.
        let mut discovered: Vec<(ThoughtId, f32)> = Vec::new();
        for candidate in self.store.recent(self.config.candidate_window) {
            let echo = text_similarity(text, &candidate.text);
            let overlap = keyword_overlap(&keywords, &candidate.keywords);
            if echo > self.config.similarity_threshold
                || overlap > self.config.keyword_overlap_threshold
            {
                discovered.push((candidate.id, echo.max(overlap)));
            }
        }

        let assignment = track_evolution.then(|| stage_of(&self.store, &keywords, created_at));

        // Commit phase.
        self.store.create(thought)?;
        let stage = match &assignment {
            Some(a) => {
                self.store.update_stage(id, a.stage)?;
                Some(a.stage)
            }
            None => None,
        };

        let mut connections = Vec::new();
        for (target, strength) in &discovered {
            self.graph.upsert(
                id,
                Connection::new(*target, ConnectionKind::Reflection, *strength),
            );
            connections.push(DiscoveredConnection {
                target: *target,
                kind: ConnectionKind::Reflection,
                strength: *strength,
            });
        }

        let strong: Vec<(ThoughtId, f32)> = discovered
            .iter()
            .filter(|(_, s)| *s >= self.config.synthesis_threshold)
            .copied()
            .collect();
        let synthesis = SynthesisMoment::from_contributions(id, &strong);

        debug!(
            "ingested {} ({} connections, stage {:?})",
            id,
            connections.len(),
            stage
        );

        // Notify only after every mutation has landed.
        self.observers.notify(&EngineEvent::ThoughtIngested {
            id,
            stage: stage.unwrap_or(1),
        });
        for connection in &connections {
            self.observers.notify(&EngineEvent::ConnectionDiscovered {
                source: id,
                target: connection.target,
                strength: connection.strength,
            });
        }
        if let Some(moment) = synthesis {
            self.observers.notify(&EngineEvent::SynthesisRecorded {
                id: moment.id,
                result: id,
                source_count: moment.source_ids.len(),
            });
            self.syntheses.push(moment);
        }

        let growth_detected = assignment.as_ref().map_or(false, |a| a.growth_detected());
        let insights = self.build_insights(
            stage,
            connections.len(),
            expression_style,
            depth_level,
        );

        Ok(IngestReport {
            thought_id: id,
            keywords,
            affect_tags,
            expression_style,
            connections,
            stage,
            growth_detected,
            insights,
        })
    }

    /// Manually record an edge between two stored thoughts.
    ///
    /// Fails with `InvalidReference` when either id is unknown; the graph is
    /// untouched on failure.
    pub fn connect(
        &mut self,
        source: ThoughtId,
        target: ThoughtId,
        kind: ConnectionKind,
        strength: f32,
    ) -> Result<(), EngineError> {
        for id in [source, target] {
            if !self.store.contains(id) {
                return Err(EngineError::InvalidReference(id));
            }
        }
        self.graph
            .upsert(source, Connection::new(target, kind, strength));
        self.observers.notify(&EngineEvent::ConnectionDiscovered {
            source,
            target,
            strength: strength.clamp(0.0, 1.0),
        });
        Ok(())
    }

    /// Trace ripples outward from an origin text. See [`trace_ripples`].
    pub fn trace_ripples(&self, origin_text: &str, max_distance: usize) -> RippleReport {
        trace_ripples(&self.store, &self.graph, origin_text, max_distance)
    }

    /// Themes active within the timeframe ending now.
    pub fn find_undercurrents(&self, timeframe: Timeframe, min_depth: f32) -> UndercurrentReport {
        self.find_undercurrents_at(timeframe, min_depth, Utc::now())
    }

    /// Themes active within the timeframe ending at `now`; split out so the
    /// window is testable against a pinned clock.
    pub fn find_undercurrents_at(
        &self,
        timeframe: Timeframe,
        min_depth: f32,
        now: DateTime<Utc>,
    ) -> UndercurrentReport {
        let thoughts = self.store.all();
        let windowed = within_timeframe(&thoughts, timeframe, now);

        let mut themes = extract_themes(&windowed);
        themes.retain(|t| t.depth >= min_depth);

        let dominant_theme = themes.first().map(|t| t.name.clone());
        let cross_currents = find_cross_currents(&themes);

        UndercurrentReport {
            themes,
            dominant_theme,
            cross_currents,
        }
    }

    /// Group every thought mentioning `concept` by evolution stage.
    ///
    /// A concept absent from the corpus yields an empty report, not an
    /// error. When `show_branches` is set, connections whose endpoints both
    /// match the concept are listed as branches.
    pub fn trace_evolution(&self, concept: &str, show_branches: bool) -> EvolutionReport {
        let matched = self.store.query_by_keyword(concept, None);

        let mut stages: BTreeMap<u32, Vec<StageEntry>> = BTreeMap::new();
        for thought in &matched {
            stages.entry(thought.stage).or_default().push(StageEntry {
                thought_id: thought.id,
                text: thought.text.clone(),
                timestamp: thought.created_at,
            });
        }

        let branches = show_branches.then(|| {
            let ids: Vec<ThoughtId> = matched.iter().map(|t| t.id).collect();
            ids.iter()
                .flat_map(|source| {
                    self.graph
                        .neighbors(*source)
                        .iter()
                        .filter(|c| ids.contains(&c.target))
                        .map(|c| Branch {
                            from: *source,
                            to: c.target,
                            strength: c.strength,
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        });

        EvolutionReport {
            concept: concept.to_string(),
            stages,
            branches,
        }
    }

    /// Discover ranked patterns of the requested kinds.
    pub fn discover_patterns(&self, kinds: &[PatternKind], threshold: f32) -> PatternReport {
        discover_patterns(&self.store.all(), kinds, threshold)
    }

    /// Register an observer for engine events.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.subscribe(observer);
    }

    /// All recorded synthesis moments, oldest first.
    pub fn synthesis_moments(&self) -> &[SynthesisMoment] {
        &self.syntheses
    }

    /// Read access to the corpus.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read access to the connection graph.
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn build_insights(
        &self,
        stage: Option<u32>,
        connection_count: usize,
        style: ExpressionStyle,
        depth_level: DepthLevel,
    ) -> Vec<String> {
        let mut insights = Vec::new();

        if let Some(stage) = stage {
            if stage > 1 {
                insights.push(format!(
                    "This thought continues a thread {stage} stages deep."
                ));
            }
        }
        match connection_count {
            0 => {}
            1 => insights.push("Echoes one earlier thought.".to_string()),
            n => insights.push(format!("Echoes {n} earlier thoughts.")),
        }
        if style == ExpressionStyle::Questioning {
            insights.push("The question itself may be the point; it can stay open.".to_string());
        }
        if depth_level == DepthLevel::Abyss {
            insights.push("Deep water. Worth returning to when it settles.".to_string());
        }

        insights
    }
}
