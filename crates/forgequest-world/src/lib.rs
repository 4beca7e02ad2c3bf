//! Locations, actions, and the fixed world graph for Forgequest.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world-graph construction and lookup.
//! - [`location`] -- [`Location`] nodes and the [`Action`]s bound to their
//!   commands.
//! - [`world_graph`] -- The immutable [`WorldGraph`] with validated
//!   transitions.
//! - [`starting_world`] -- The eight-location map every session plays on.

pub mod error;
pub mod location;
pub mod starting_world;
pub mod world_graph;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use location::{Action, Location};
pub use starting_world::create_starting_world;
pub use world_graph::WorldGraph;
