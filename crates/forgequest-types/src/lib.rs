//! Shared type definitions for the Forgequest narrative engine.
//!
//! This crate is the single source of truth for the data that flows between
//! the world graph, the action resolver, and the heat scheduler. Everything
//! here is plain data: no locking, no I/O.
//!
//! # Modules
//!
//! - [`ids`] -- The closed set of location identifiers
//! - [`enums`] -- Effect and prerequisite tags referenced by actions
//! - [`state`] -- The mutable [`GameState`] aggregate

pub mod enums;
pub mod ids;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use enums::{Effect, Prerequisite};
pub use ids::LocationId;
pub use state::GameState;
