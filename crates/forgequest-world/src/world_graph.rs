//! The world graph: locations as nodes, transitions as labelled edges.
//!
//! [`WorldGraph`] is built once at startup and never mutated while a session
//! runs; only the game state moves through it. Construction goes through
//! [`WorldGraph::from_locations`], which rejects duplicate ids and
//! transitions that point outside the graph.

use std::collections::BTreeMap;

use forgequest_types::LocationId;

use crate::error::WorldError;
use crate::location::{Action, Location};

/// The immutable map of locations and their command tables.
///
/// Deserializing goes through [`WorldGraph::from_locations`]; a loaded graph
/// is validated exactly like one built in code.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GraphRecord")]
pub struct WorldGraph {
    /// All locations indexed by their identifier.
    locations: BTreeMap<LocationId, Location>,
}

/// Unvalidated wire form of a [`WorldGraph`]. Map keys are ignored in
/// favour of each location's own id.
#[derive(serde::Deserialize)]
struct GraphRecord {
    locations: BTreeMap<LocationId, Location>,
}

impl TryFrom<GraphRecord> for WorldGraph {
    type Error = WorldError;

    fn try_from(record: GraphRecord) -> Result<Self, Self::Error> {
        Self::from_locations(record.locations.into_values())
    }
}

impl WorldGraph {
    /// Build and validate a graph from its locations.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateLocation`] if two locations share an
    /// id, or [`WorldError::DanglingTransition`] if any action moves the
    /// player to a location that is not part of the graph.
    pub fn from_locations(
        locations: impl IntoIterator<Item = Location>,
    ) -> Result<Self, WorldError> {
        let mut map = BTreeMap::new();
        for location in locations {
            let id = location.id;
            if map.insert(id, location).is_some() {
                return Err(WorldError::DuplicateLocation(id));
            }
        }
        let graph = Self { locations: map };
        graph.validate()?;
        Ok(graph)
    }

    /// Check that every transition lands on a known location.
    fn validate(&self) -> Result<(), WorldError> {
        for location in self.locations.values() {
            for (command, action) in location.actions() {
                if let Some(to) = action.next_location {
                    if !self.locations.contains_key(&to) {
                        return Err(WorldError::DanglingTransition {
                            from: location.id,
                            command: command.clone(),
                            to,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Get a location by id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`] if the id is not in the graph.
    pub fn location(&self, id: LocationId) -> Result<&Location, WorldError> {
        self.locations
            .get(&id)
            .ok_or(WorldError::LocationNotFound(id))
    }

    /// The ordered command table of a location.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LocationNotFound`] if the id is not in the graph.
    pub fn actions(&self, id: LocationId) -> Result<&[(String, Action)], WorldError> {
        self.location(id).map(Location::actions)
    }

    /// Return the number of locations in the graph.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Iterate over all locations in id order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_missing_location() {
        let graph = WorldGraph::from_locations([
            Location::new(LocationId::Start, "Begin.")
                .with_action("go north", Action::travel(LocationId::Forest))
                .unwrap(),
            Location::new(LocationId::Forest, "Trees."),
        ])
        .unwrap();

        assert_eq!(graph.location_count(), 2);
        assert_eq!(graph.location(LocationId::Forest).unwrap().description, "Trees.");
        assert_eq!(graph.actions(LocationId::Start).unwrap().len(), 1);
        assert_eq!(
            graph.location(LocationId::Cave).unwrap_err(),
            WorldError::LocationNotFound(LocationId::Cave)
        );
    }

    #[test]
    fn dangling_transition_rejected() {
        let result = WorldGraph::from_locations([Location::new(LocationId::Start, "Begin.")
            .with_action("go north", Action::travel(LocationId::Forest))
            .unwrap()]);
        assert_eq!(
            result.unwrap_err(),
            WorldError::DanglingTransition {
                from: LocationId::Start,
                command: String::from("go north"),
                to: LocationId::Forest,
            }
        );
    }

    #[test]
    fn deserialized_dangling_transition_rejected() {
        let json = r#"{"locations":{"start":{"id":"start","description":"Begin.",
            "actions":[["Go North",{"next_location":"cave"}]]}}}"#;
        let err = serde_json::from_str::<WorldGraph>(json).unwrap_err();
        assert!(
            err.to_string().contains("leads to missing location cave"),
            "{err}"
        );
    }

    #[test]
    fn deserialized_duplicate_command_rejected() {
        let json = r#"{"locations":{
            "start":{"id":"start","description":"Begin.","actions":[
                ["Go North",{"next_location":"cave"}],
                ["go north",{"message":"again"}]]},
            "cave":{"id":"cave","description":"Damp."}}}"#;
        let err = serde_json::from_str::<WorldGraph>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate command"), "{err}");
    }

    #[test]
    fn deserialized_location_id_wins_over_map_key() {
        let json = r#"{"locations":{
            "start":{"id":"start","description":"One."},
            "cave":{"id":"start","description":"Two."}}}"#;
        let err = serde_json::from_str::<WorldGraph>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate location id: start"), "{err}");
    }

    #[test]
    fn valid_graph_survives_deserialization() {
        let json = r#"{"locations":{
            "start":{"id":"start","description":"Begin.",
                "actions":[["Go North",{"next_location":"cave"}]]},
            "cave":{"id":"cave","description":"Damp."}}}"#;
        let graph: WorldGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.location_count(), 2);
        assert_eq!(
            graph
                .location(LocationId::Start)
                .unwrap()
                .find("go north")
                .unwrap()
                .next_location,
            Some(LocationId::Cave)
        );
    }

    #[test]
    fn duplicate_location_rejected() {
        let result = WorldGraph::from_locations([
            Location::new(LocationId::Start, "One."),
            Location::new(LocationId::Start, "Two."),
        ]);
        assert_eq!(
            result.unwrap_err(),
            WorldError::DuplicateLocation(LocationId::Start)
        );
    }
}
