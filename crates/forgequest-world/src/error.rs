//! Error types for the `forgequest-world` crate.

use forgequest_types::LocationId;

/// Errors that can occur while building or querying the world graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A location was not found in the world graph.
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// A location with the same identifier was already added.
    #[error("duplicate location id: {0}")]
    DuplicateLocation(LocationId),

    /// Two actions in one location share a command (case-insensitive).
    #[error("duplicate command {command:?} at location {location}")]
    DuplicateCommand {
        /// The location holding both actions.
        location: LocationId,
        /// The normalized command string.
        command: String,
    },

    /// An action moves the player to a location missing from the graph.
    #[error("command {command:?} at {from} leads to missing location {to}")]
    DanglingTransition {
        /// Location declaring the action.
        from: LocationId,
        /// The offending command.
        command: String,
        /// The target that does not exist.
        to: LocationId,
    },
}
