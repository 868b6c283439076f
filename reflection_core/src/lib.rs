//! # Reflection Core (Undercurrent)
//!
//! The engine of the reflection system. This crate interfaces with
//! `thought_store`, maintains a connection graph over ingested thoughts, and
//! derives ripples, evolution stages, themes, and patterns from the
//! accumulated corpus.
//!
//! ## Core Components
//!
//! - **lexicon**: Keyword extraction, affect detection, expression style
//! - **similarity**: The single Jaccard primitive all overlap metrics share
//! - **graph**: Typed, weighted connections between thought ids
//! - **evolution**: Write-once stage assignment over conceptual ancestors
//! - **ripple**: Bounded breadth-first influence propagation
//! - **themes**: Theme depth scoring, cross-currents, undercurrents
//! - **patterns**: Deterministic per-kind pattern discovery
//! - **engine**: The facade tying ingestion and queries together
//!
//! ## Design Philosophy
//!
//! - **Single writer**: Ingestion is the only mutating path; every other
//!   operation is read-only over the shared corpus and graph
//! - **Deterministic**: All scores are functions of input and corpus state,
//!   never randomness
//! - **Index, not container**: The graph references thoughts by id only; the
//!   store owns the records

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod evolution;
pub mod graph;
pub mod lexicon;
pub mod patterns;
pub mod ripple;
pub mod similarity;
pub mod synthesis;
pub mod themes;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use graph::*;
pub use patterns::*;
pub use ripple::*;
pub use synthesis::*;
pub use themes::*;
