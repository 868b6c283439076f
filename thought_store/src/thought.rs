//! Thought record definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for thoughts in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThoughtId(pub Uuid);

impl ThoughtId {
    /// Create a new random thought ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a thought ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty thought ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ThoughtId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requested reflection depth for a thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DepthLevel {
    /// Everyday observation.
    #[default]
    Surface,
    /// Deliberate reflection.
    Deep,
    /// Existential territory.
    Abyss,
}

impl DepthLevel {
    /// Numeric weight used by theme aggregation.
    pub fn weight(&self) -> f32 {
        match self {
            DepthLevel::Surface => 1.0,
            DepthLevel::Deep => 2.0,
            DepthLevel::Abyss => 3.0,
        }
    }

    /// Base resonance a thought of this depth contributes to a ripple wave.
    pub fn base_resonance(&self) -> f32 {
        match self {
            DepthLevel::Surface => 0.4,
            DepthLevel::Deep => 0.7,
            DepthLevel::Abyss => 1.0,
        }
    }
}

/// Detected emotional tone of a thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affect {
    Joy,
    Sadness,
    Anger,
    Fear,
    Curiosity,
    Calm,
    Hope,
    Neutral,
}

impl Affect {
    /// String label for reports and pattern names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Affect::Joy => "joy",
            Affect::Sadness => "sadness",
            Affect::Anger => "anger",
            Affect::Fear => "fear",
            Affect::Curiosity => "curiosity",
            Affect::Calm => "calm",
            Affect::Hope => "hope",
            Affect::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Affect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a thought is voiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionStyle {
    Questioning,
    Affirming,
    Negating,
    Exploring,
    Concluding,
    #[default]
    Neutral,
}

/// One ingested text record with derived metadata.
///
/// A thought is immutable once created, with a single exception: `stage` is
/// written exactly once by the evolution tracker and never decreases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thought {
    pub id: ThoughtId,

    /// Original input text, non-empty.
    pub text: String,

    /// Depth requested at ingestion time.
    pub depth_level: DepthLevel,

    /// When this thought entered the corpus.
    pub created_at: DateTime<Utc>,

    /// Extracted keywords, first-occurrence order, capped.
    pub keywords: Vec<String>,

    /// Detected emotional tones.
    pub affect_tags: Vec<Affect>,

    /// Detected expression style.
    pub expression_style: ExpressionStyle,

    /// Position in a concept's evolution chain. Defaults to 1.
    pub stage: u32,

    /// Flexible side-band data for callers.
    #[serde(default)]
    pub annotations: HashMap<String, serde_json::Value>,
}

impl Thought {
    /// Create a new thought with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ThoughtId::new(),
            text: text.into(),
            depth_level: DepthLevel::Surface,
            created_at: Utc::now(),
            keywords: Vec::new(),
            affect_tags: Vec::new(),
            expression_style: ExpressionStyle::Neutral,
            stage: 1,
            annotations: HashMap::new(),
        }
    }

    /// Set the depth level.
    pub fn with_depth(mut self, depth: DepthLevel) -> Self {
        self.depth_level = depth;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attach extracted keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// Attach detected affect tags.
    pub fn with_affects(mut self, affects: Vec<Affect>) -> Self {
        self.affect_tags = affects;
        self
    }

    /// Set the expression style.
    pub fn with_style(mut self, style: ExpressionStyle) -> Self {
        self.expression_style = style;
        self
    }

    /// Check whether this thought's text contains a keyword
    /// (case-insensitive).
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.text.to_lowercase().contains(&keyword.to_lowercase())
    }

    /// Base resonance this thought contributes during ripple tracing.
    pub fn base_resonance(&self) -> f32 {
        self.depth_level.base_resonance()
    }
}
