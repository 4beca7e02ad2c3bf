//! Location identifiers.
//!
//! The world map is fixed at compile time, so locations are named by a closed
//! enumeration rather than free-form strings.

use serde::{Deserialize, Serialize};

/// Identifier of a node in the world graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    /// Where every adventure begins.
    Start,
    /// The dark forest north of the start.
    Forest,
    /// The mossy cave beyond the forest.
    Cave,
    /// The forge. Burns down when overheated.
    Blacksmith,
    /// The town square, hub for the other buildings.
    Town,
    /// The evil wizard's tower.
    Wizard,
    /// The quest giver's hall.
    Quest,
    /// The chapel and its priest.
    Chapel,
}

impl LocationId {
    /// Every location, in map order.
    pub const ALL: [Self; 8] = [
        Self::Start,
        Self::Forest,
        Self::Cave,
        Self::Blacksmith,
        Self::Town,
        Self::Wizard,
        Self::Quest,
        Self::Chapel,
    ];

    /// Return the canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Forest => "forest",
            Self::Cave => "cave",
            Self::Blacksmith => "blacksmith",
            Self::Town => "town",
            Self::Wizard => "wizard",
            Self::Quest => "quest",
            Self::Chapel => "chapel",
        }
    }
}

impl core::fmt::Display for LocationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_name() {
        for id in LocationId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{id}\""));
        }
    }

    #[test]
    fn serializes_as_lowercase_name() {
        let json = serde_json::to_string(&LocationId::Chapel).unwrap();
        assert_eq!(json, "\"chapel\"");
    }
}
