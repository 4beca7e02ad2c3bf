//! Effect and prerequisite tags.
//!
//! Actions in the world graph reference behaviour by tag instead of storing
//! function values, which keeps the action table data-only and serializable.
//! The core crate dispatches on these tags with an exhaustive `match`.

use serde::{Deserialize, Serialize};

use crate::state::GameState;

/// A named state-mutating effect triggered by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Ask the blacksmith to forge a sword.
    RequestSword,
    /// Start heating the forge.
    HeatForge,
    /// Douse the forge, resetting the heat.
    CoolForge,
    /// Inspect the sword on the anvil.
    CheckSword,
    /// Conjure a sword out of thin air.
    Cheat,
    /// Ask the priest to bless the sword in hand.
    PriestBlessing,
    /// Let the wizard enchant the sword with dark magic.
    EvilEnchant,
    /// Present yourself to the quest giver.
    QuestGiver,
}

/// A boolean gate evaluated against [`GameState`] before an action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prerequisite {
    /// The blacksmith has not burned down.
    BlacksmithStanding,
    /// A sword has been requested from the blacksmith.
    SwordRequested,
    /// The player carries an unenchanted sword.
    HasPlainSword,
    /// The priest is still alive.
    PriestAlive,
    /// The quest giver is still alive.
    QuestGiverAlive,
}

impl Prerequisite {
    /// Evaluate the gate against the current state.
    pub const fn is_met(self, state: &GameState) -> bool {
        match self {
            Self::BlacksmithStanding => !state.blacksmith_burned_down,
            Self::SwordRequested => state.sword_requested,
            Self::HasPlainSword => state.has_sword,
            Self::PriestAlive => state.priest_alive,
            Self::QuestGiverAlive => state.quest_giver_alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blacksmith_gate_closes_after_fire() {
        let mut state = GameState::new();
        assert!(Prerequisite::BlacksmithStanding.is_met(&state));
        state.blacksmith_burned_down = true;
        assert!(!Prerequisite::BlacksmithStanding.is_met(&state));
    }

    #[test]
    fn gates_follow_their_flags() {
        let mut state = GameState::new();
        assert!(!Prerequisite::SwordRequested.is_met(&state));
        assert!(!Prerequisite::HasPlainSword.is_met(&state));
        assert!(Prerequisite::PriestAlive.is_met(&state));
        assert!(Prerequisite::QuestGiverAlive.is_met(&state));

        state.sword_requested = true;
        state.has_sword = true;
        state.priest_alive = false;
        state.quest_giver_alive = false;

        assert!(Prerequisite::SwordRequested.is_met(&state));
        assert!(Prerequisite::HasPlainSword.is_met(&state));
        assert!(!Prerequisite::PriestAlive.is_met(&state));
        assert!(!Prerequisite::QuestGiverAlive.is_met(&state));
    }
}
