//! # Thought Store
//!
//! The "corpus" crate - contains the thought record model and the store
//! abstraction the reflection engine reads and writes through. This crate is
//! the single source of truth for persisted thoughts and does not contain any
//! graph or scoring logic.

pub mod error;
pub mod store;
pub mod thought;

pub use error::*;
pub use store::*;
pub use thought::*;
