//! Location nodes and the actions bound to their commands.
//!
//! A [`Location`] owns an ordered command table. Lookups are
//! case-insensitive (commands are stored lowercase), and iteration follows
//! declaration order so that action listings read the way the map author
//! wrote them.

use forgequest_types::{Effect, LocationId, Prerequisite};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A possibly gated, possibly state-mutating response to one command.
///
/// `next_location` and `effect` are mutually exclusive in practice, but the
/// model does not forbid both. An action with neither a transition nor a
/// message is treated as misconfigured by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Where the player moves when the action runs.
    pub next_location: Option<LocationId>,
    /// Static narrative shown before any effect text.
    pub message: Option<String>,
    /// Effect executed after the message.
    pub effect: Option<Effect>,
    /// Gate that must hold for the action to run at all.
    pub prerequisite: Option<Prerequisite>,
}

impl Action {
    /// An action that moves the player to `to`.
    pub const fn travel(to: LocationId) -> Self {
        Self {
            next_location: Some(to),
            message: None,
            effect: None,
            prerequisite: None,
        }
    }

    /// An action that prints `message`.
    pub fn narrate(message: &str) -> Self {
        Self {
            next_location: None,
            message: Some(message.to_owned()),
            effect: None,
            prerequisite: None,
        }
    }

    /// Attach an effect that runs after the message.
    #[must_use]
    pub const fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Gate the action behind `prerequisite`.
    #[must_use]
    pub const fn requires(mut self, prerequisite: Prerequisite) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }
}

/// A node in the world graph.
///
/// Deserialization replays every entry through [`Location::add_action`], so
/// keys are normalized and duplicates are rejected on load as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LocationRecord")]
pub struct Location {
    /// Identifier of this location.
    pub id: LocationId,
    /// Text shown on arrival and on "look around".
    pub description: String,
    /// Command table in declaration order. Keys are lowercase.
    actions: Vec<(String, Action)>,
}

impl Location {
    /// Create a location with an empty command table.
    pub fn new(id: LocationId, description: &str) -> Self {
        Self {
            id,
            description: description.to_owned(),
            actions: Vec::new(),
        }
    }

    /// Bind `action` to `command`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCommand`] if the command (ignoring
    /// case and surrounding whitespace) is already bound here.
    pub fn add_action(&mut self, command: &str, action: Action) -> Result<(), WorldError> {
        let key = normalize(command);
        if self.find(&key).is_some() {
            return Err(WorldError::DuplicateCommand {
                location: self.id,
                command: key,
            });
        }
        self.actions.push((key, action));
        Ok(())
    }

    /// Builder form of [`add_action`](Self::add_action).
    ///
    /// # Errors
    ///
    /// Same as [`add_action`](Self::add_action).
    pub fn with_action(mut self, command: &str, action: Action) -> Result<Self, WorldError> {
        self.add_action(command, action)?;
        Ok(self)
    }

    /// Look up the action bound to `command`, ignoring case.
    pub fn find(&self, command: &str) -> Option<&Action> {
        let key = normalize(command);
        self.actions
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, action)| action)
    }

    /// The command table in declaration order.
    pub fn actions(&self) -> &[(String, Action)] {
        &self.actions
    }

    /// Command names in declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }
}

/// Unvalidated wire form of a [`Location`].
#[derive(Deserialize)]
struct LocationRecord {
    id: LocationId,
    description: String,
    #[serde(default)]
    actions: Vec<(String, Action)>,
}

impl TryFrom<LocationRecord> for Location {
    type Error = WorldError;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        let mut location = Self {
            id: record.id,
            description: record.description,
            actions: Vec::with_capacity(record.actions.len()),
        };
        for (command, action) in record.actions {
            location.add_action(&command, action)?;
        }
        Ok(location)
    }
}

/// Canonical form of a command: trimmed and lowercased.
pub fn normalize(command: &str) -> String {
    command.trim().to_lowercase()
}
