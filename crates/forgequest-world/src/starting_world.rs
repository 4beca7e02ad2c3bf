//! Default starting world for Forgequest.
//!
//! Creates the eight locations of the adventure: the wilderness path
//! (start, forest, cave) leading to a town hub with four buildings
//! (blacksmith, wizard, quest hall, chapel).

use forgequest_types::{Effect, LocationId, Prerequisite};
use tracing::debug;

use crate::error::WorldError;
use crate::location::{Action, Location};
use crate::world_graph::WorldGraph;

/// Create the default world graph.
///
/// # Errors
///
/// Returns [`WorldError`] if the map construction fails (should not happen
/// with valid hard-coded data).
#[allow(clippy::too_many_lines)]
pub fn create_starting_world() -> Result<WorldGraph, WorldError> {
    // ---------------------------------------------------------------
    // Wilderness
    // ---------------------------------------------------------------

    let start = Location::new(
        LocationId::Start,
        "You are at the beginning of your adventure. There's a path leading north.",
    )
    .with_action("go north", Action::travel(LocationId::Forest))?
    .with_action(
        "cheat",
        Action::narrate("A mysterious force tingles in your palm.").with_effect(Effect::Cheat),
    )?;

    let forest = Location::new(
        LocationId::Forest,
        "You are in a dark forest. The trees are thick and you can barely see sunlight. \
         Paths lead north and south.",
    )
    .with_action("go north", Action::travel(LocationId::Cave))?
    .with_action("go south", Action::travel(LocationId::Start))?;

    let cave = Location::new(
        LocationId::Cave,
        "You have entered a damp cave. The walls are covered with moss and there's a strange \
         noise echoing. A path leads south, and daylight beyond the far opening hints at a town.",
    )
    .with_action("go south", Action::travel(LocationId::Forest))?
    .with_action("go to town", Action::travel(LocationId::Town))?;

    // ---------------------------------------------------------------
    // Town
    // ---------------------------------------------------------------

    let town = Location::new(
        LocationId::Town,
        "You are in a bustling town square. A blacksmith's forge smokes to one side, a \
         wizard's tower looms over the rooftops, the quest hall's doors stand open and the \
         chapel bell rings softly.",
    )
    .with_action(
        "blacksmith",
        Action::travel(LocationId::Blacksmith).requires(Prerequisite::BlacksmithStanding),
    )?
    .with_action("wizard", Action::travel(LocationId::Wizard))?
    .with_action("quest", Action::travel(LocationId::Quest))?
    .with_action("chapel", Action::travel(LocationId::Chapel))?
    .with_action("go to cave", Action::travel(LocationId::Cave))?;

    let blacksmith = Location::new(
        LocationId::Blacksmith,
        "You are in the blacksmith's workshop. The forge glows beside a heavy anvil, and the \
         smith wipes soot from their brow.",
    )
    .with_action(
        "request sword",
        Action::narrate("You ask the blacksmith to forge you a sword.")
            .with_effect(Effect::RequestSword),
    )?
    .with_action(
        "heat forge",
        Action::narrate("You work the bellows.").with_effect(Effect::HeatForge),
    )?
    .with_action(
        "cool forge",
        Action::narrate("You throw a bucket of water over the coals.")
            .with_effect(Effect::CoolForge),
    )?
    .with_action(
        "check sword",
        Action::narrate("You lean over the anvil to inspect the blade.")
            .with_effect(Effect::CheckSword)
            .requires(Prerequisite::SwordRequested),
    )?
    .with_action("leave", Action::travel(LocationId::Town))?;

    let wizard = Location::new(
        LocationId::Wizard,
        "You climb into the wizard's tower. Green flames dance in braziers and a robed figure \
         eyes your belt hungrily.",
    )
    .with_action(
        "enchant sword",
        Action::narrate("The wizard runs a bony finger along your blade.")
            .with_effect(Effect::EvilEnchant)
            .requires(Prerequisite::HasPlainSword),
    )?
    .with_action("leave", Action::travel(LocationId::Town))?;

    let quest = Location::new(
        LocationId::Quest,
        "You enter the quest hall. Maps cover the walls and a grizzled quest giver sits \
         behind a long table.",
    )
    .with_action(
        "talk to quest giver",
        Action::narrate("You approach the quest giver.")
            .with_effect(Effect::QuestGiver)
            .requires(Prerequisite::QuestGiverAlive),
    )?
    .with_action("leave", Action::travel(LocationId::Town))?;

    let chapel = Location::new(
        LocationId::Chapel,
        "You step into a quiet chapel. Candles flicker before the altar where an old priest \
         kneels in prayer.",
    )
    .with_action(
        "ask for blessing",
        Action::narrate("You kneel before the priest.")
            .with_effect(Effect::PriestBlessing)
            .requires(Prerequisite::PriestAlive),
    )?
    .with_action("leave", Action::travel(LocationId::Town))?;

    let graph =
        WorldGraph::from_locations([start, forest, cave, town, blacksmith, wizard, quest, chapel])?;
    debug!(location_count = graph.location_count(), "Starting world created");
    Ok(graph)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_location_is_present() {
        let graph = create_starting_world().unwrap();
        assert_eq!(graph.location_count(), LocationId::ALL.len());
        for id in LocationId::ALL {
            assert!(graph.location(id).is_ok(), "missing {id}");
        }
    }

    #[test]
    fn town_lists_blacksmith_first() {
        let graph = create_starting_world().unwrap();
        let town = graph.location(LocationId::Town).unwrap();
        assert_eq!(town.commands().next(), Some("blacksmith"));
    }

    #[test]
    fn blacksmith_entry_is_gated() {
        let graph = create_starting_world().unwrap();
        let entry = graph
            .location(LocationId::Town)
            .unwrap()
            .find("blacksmith")
            .unwrap();
        assert_eq!(entry.prerequisite, Some(Prerequisite::BlacksmithStanding));
    }

    #[test]
    fn every_location_can_be_left() {
        let graph = create_starting_world().unwrap();
        for location in graph.locations() {
            assert!(
                location
                    .actions()
                    .iter()
                    .any(|(_, action)| action.next_location.is_some()),
                "{} is a dead end",
                location.id
            );
        }
    }

    #[test]
    fn world_is_serializable() {
        let graph = create_starting_world().unwrap();
        let json = serde_json::to_value(&graph).unwrap();
        let text = json.to_string();
        assert!(text.contains("\"check_sword\""));
        assert!(text.contains("\"blacksmith_standing\""));
        let round: WorldGraph = serde_json::from_value(json).unwrap();
        assert_eq!(round.location_count(), graph.location_count());
    }
}
