//! Command resolution: from raw player text to narrative and state change.
//!
//! Resolution follows a strict precedence:
//!
//! 1. Normalize (trim, lowercase).
//! 2. `quit` / `exit` end the session, before any location lookup.
//! 3. `list actions` prints the command listing.
//! 4. `look around` / `here` re-describe the current location.
//! 5. Everything else is looked up in the current location's table, gated
//!    by its prerequisite, then either moves the player or runs its effect.
//!
//! Only step 5 mutates state, apart from the `active` flag in step 2.

use forgequest_types::GameState;
use forgequest_world::{Action, WorldGraph, location::normalize};
use tracing::warn;

use crate::effects;
use crate::observer::Observer;

/// Response to any command not bound at the current location.
pub const UNRECOGNIZED: &str = "I don't understand that command.";

/// Response when a gate fails or an action has nothing to do.
pub const NOT_NOW: &str = "You can't do that right now.";

/// Response to `quit` / `exit`.
pub const FAREWELL: &str = "You have ended your adventure.";

/// Fallback description for a location missing from the graph.
const NOTHING_HERE: &str = "You see nothing of interest.";

/// Meta-command appended to every listing. Never stored in a location.
const LOOK_AROUND: &str = "look around";

/// How a command was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The player quit; `active` is now false.
    Quit,
    /// The available actions were listed.
    Listed,
    /// The current location was described again.
    Described,
    /// The player moved to a new location.
    Moved,
    /// An action printed its message and ran its effect, if any.
    Narrated,
    /// No such command here.
    Unrecognized,
    /// The action's prerequisite evaluated false.
    PrerequisiteNotMet,
    /// The action has neither a transition nor a message.
    Misconfigured,
}

/// Narrative outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// How the command was handled.
    pub kind: ResolutionKind,
    /// Text for the player.
    pub narrative: String,
}

impl Resolution {
    fn new(kind: ResolutionKind, narrative: impl Into<String>) -> Self {
        Self {
            kind,
            narrative: narrative.into(),
        }
    }
}

/// Resolve `raw` against the current location, mutating `state` in place.
pub fn resolve(
    graph: &WorldGraph,
    state: &mut GameState,
    raw: &str,
    observer: &dyn Observer,
) -> Resolution {
    let command = normalize(raw);

    match command.as_str() {
        "quit" | "exit" => {
            state.active = false;
            return Resolution::new(ResolutionKind::Quit, FAREWELL);
        }
        "list actions" => {
            return Resolution::new(ResolutionKind::Listed, list_actions(graph, state));
        }
        "look around" | "here" => {
            return Resolution::new(ResolutionKind::Described, describe(graph, state));
        }
        _ => {}
    }

    let Ok(location) = graph.location(state.current_location) else {
        observer.on_error("current location is missing from the world graph");
        return Resolution::new(ResolutionKind::Unrecognized, UNRECOGNIZED);
    };
    let Some(action) = location.find(&command) else {
        return Resolution::new(ResolutionKind::Unrecognized, UNRECOGNIZED);
    };

    if let Some(prerequisite) = action.prerequisite {
        if !prerequisite.is_met(state) {
            return Resolution::new(ResolutionKind::PrerequisiteNotMet, NOT_NOW);
        }
    }

    execute(graph, state, &command, action, observer)
}

/// Run an action whose prerequisite already holds.
fn execute(
    graph: &WorldGraph,
    state: &mut GameState,
    command: &str,
    action: &Action,
    observer: &dyn Observer,
) -> Resolution {
    if let Some(next) = action.next_location {
        state.current_location = next;
        return Resolution::new(ResolutionKind::Moved, describe(graph, state));
    }

    let Some(message) = &action.message else {
        warn!(
            location = %state.current_location,
            command,
            "action has neither a transition nor a message"
        );
        observer.on_error("misconfigured action");
        return Resolution::new(ResolutionKind::Misconfigured, NOT_NOW);
    };

    let mut narrative = message.clone();
    if let Some(effect) = action.effect {
        narrative.push('\n');
        narrative.push_str(&effects::apply(effect, state, observer));
    }
    Resolution::new(ResolutionKind::Narrated, narrative)
}

/// Commands valid at the current location, plus the "look around" suffix.
pub fn list_actions(graph: &WorldGraph, state: &GameState) -> String {
    let mut commands: Vec<&str> = graph
        .location(state.current_location)
        .map(|location| location.commands().collect())
        .unwrap_or_default();
    commands.push(LOOK_AROUND);
    format!("Available actions: {}", commands.join(", "))
}

/// Description of the current location followed by its action listing.
pub fn describe(graph: &WorldGraph, state: &GameState) -> String {
    let description = graph
        .location(state.current_location)
        .map_or(NOTHING_HERE, |location| location.description.as_str());
    format!("{description}\n{}", list_actions(graph, state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forgequest_types::{Effect, LocationId, Prerequisite};
    use forgequest_world::{Location, create_starting_world};

    use super::*;
    use crate::observer::NoOpObserver;

    fn run(graph: &WorldGraph, state: &mut GameState, raw: &str) -> Resolution {
        resolve(graph, state, raw, &NoOpObserver)
    }

    #[test]
    fn quit_in_any_case_from_anywhere() {
        let graph = create_starting_world().unwrap();
        for word in ["quit", "EXIT", "Quit", "  exit  "] {
            for id in LocationId::ALL {
                let mut state = GameState::new();
                state.current_location = id;
                let res = run(&graph, &mut state, word);
                assert_eq!(res.kind, ResolutionKind::Quit);
                assert_eq!(res.narrative, FAREWELL);
                assert!(!state.active);
            }
        }
    }

    #[test]
    fn quit_overrides_a_location_action_named_quit() {
        let graph = WorldGraph::from_locations([Location::new(LocationId::Start, "Begin.")
            .with_action("quit", Action::narrate("never shown"))
            .unwrap()])
        .unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "quit");
        assert_eq!(res.kind, ResolutionKind::Quit);
        assert!(!state.active);
    }

    #[test]
    fn list_actions_keeps_order_and_appends_look_around() {
        let graph = create_starting_world().unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "List Actions");
        assert_eq!(res.kind, ResolutionKind::Listed);
        assert_eq!(res.narrative, "Available actions: go north, cheat, look around");
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn look_around_and_here_describe_without_mutation() {
        let graph = create_starting_world().unwrap();
        for word in ["look around", "here"] {
            let mut state = GameState::new();
            let res = run(&graph, &mut state, word);
            assert_eq!(res.kind, ResolutionKind::Described);
            assert!(res.narrative.starts_with("You are at the beginning"));
            assert!(res.narrative.ends_with("look around"));
            assert_eq!(state, GameState::new());
        }
    }

    #[test]
    fn unknown_commands_leave_state_untouched() {
        let graph = create_starting_world().unwrap();
        for id in LocationId::ALL {
            for word in ["dance", "go nowhere", "check sword please", ""] {
                let mut state = GameState::new();
                state.current_location = id;
                let before = state.clone();
                let res = run(&graph, &mut state, word);
                assert_eq!(res.kind, ResolutionKind::Unrecognized, "{id}: {word:?}");
                assert_eq!(res.narrative, UNRECOGNIZED);
                assert_eq!(state, before);
            }
        }
    }

    #[test]
    fn travel_moves_and_describes() {
        let graph = create_starting_world().unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "GO NORTH");
        assert_eq!(res.kind, ResolutionKind::Moved);
        assert_eq!(state.current_location, LocationId::Forest);
        assert!(res.narrative.contains("dark forest"));
        assert!(res.narrative.contains("Available actions: go north, go south, look around"));
    }

    #[test]
    fn failed_prerequisite_has_no_side_effects() {
        let graph = create_starting_world().unwrap();
        let mut state = GameState::new();
        state.current_location = LocationId::Town;
        state.blacksmith_burned_down = true;
        let before = state.clone();
        let res = run(&graph, &mut state, "blacksmith");
        assert_eq!(res.kind, ResolutionKind::PrerequisiteNotMet);
        assert_eq!(res.narrative, NOT_NOW);
        assert_eq!(state, before);
    }

    #[test]
    fn message_then_effect_text() {
        let graph = create_starting_world().unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "cheat");
        assert_eq!(res.kind, ResolutionKind::Narrated);
        let mut lines = res.narrative.lines();
        assert_eq!(lines.next(), Some("A mysterious force tingles in your palm."));
        assert_eq!(lines.next(), Some("A sword materializes in your hand."));
        assert!(state.has_sword);
    }

    #[test]
    fn message_without_effect() {
        let graph = WorldGraph::from_locations([Location::new(LocationId::Start, "Begin.")
            .with_action("sing", Action::narrate("La la la."))
            .unwrap()])
        .unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "sing");
        assert_eq!(res.narrative, "La la la.");
    }

    #[test]
    fn misconfigured_action_falls_back() {
        let bare = Action {
            effect: Some(Effect::Cheat),
            prerequisite: Some(Prerequisite::PriestAlive),
            ..Action::default()
        };
        let graph = WorldGraph::from_locations([Location::new(LocationId::Start, "Begin.")
            .with_action("poke", bare)
            .unwrap()])
        .unwrap();
        let mut state = GameState::new();
        let res = run(&graph, &mut state, "poke");
        assert_eq!(res.kind, ResolutionKind::Misconfigured);
        assert_eq!(res.narrative, NOT_NOW);
        assert!(!state.has_sword);
    }

    #[test]
    fn missing_location_is_tolerated() {
        let graph = WorldGraph::from_locations([Location::new(LocationId::Start, "Begin.")])
            .unwrap();
        let mut state = GameState::new();
        state.current_location = LocationId::Chapel;
        assert_eq!(
            describe(&graph, &state),
            "You see nothing of interest.\nAvailable actions: look around"
        );
        let res = run(&graph, &mut state, "pray");
        assert_eq!(res.kind, ResolutionKind::Unrecognized);
    }
}
