//! The mutable game state aggregate.
//!
//! [`GameState`] holds every dynamic flag and counter of a session plus the
//! player's current location. A session owns exactly one instance behind a
//! single lock; the command loop and the heat scheduler both mutate it in
//! place. Nothing in here synchronizes itself.

use serde::{Deserialize, Serialize};

use crate::ids::LocationId;

/// All dynamic state of a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GameState {
    /// Session liveness. Once false, no command runs and the forge stops.
    pub active: bool,
    /// Where the player currently stands.
    pub current_location: LocationId,
    /// Forge temperature. Only 0..=100 has defined behaviour.
    pub heat: u32,
    /// Whether the scheduler should raise the heat each tick.
    pub is_heating_forge: bool,
    /// One-way: set when the forge overheats.
    pub blacksmith_burned_down: bool,
    /// The blacksmith has agreed to forge a sword.
    pub sword_requested: bool,
    /// The player holds a plain sword.
    pub has_sword: bool,
    /// The player holds a sword cursed by the wizard.
    pub has_evil_sword: bool,
    /// The player holds a sword blessed by the priest.
    pub has_holy_sword: bool,
    /// Swords lost to an overheated forge. Never decreases.
    pub failed_sword_attempts: u32,
    /// The quest giver accepted the player.
    pub quest_accepted: bool,
    /// The priest has not yet absorbed a curse.
    pub priest_alive: bool,
    /// The quest giver has not yet been struck down by an evil sword.
    pub quest_giver_alive: bool,
}

impl GameState {
    /// Create the state every session starts from.
    pub const fn new() -> Self {
        Self {
            active: true,
            current_location: LocationId::Start,
            heat: 0,
            is_heating_forge: false,
            blacksmith_burned_down: false,
            sword_requested: false,
            has_sword: false,
            has_evil_sword: false,
            has_holy_sword: false,
            failed_sword_attempts: 0,
            quest_accepted: false,
            priest_alive: true,
            quest_giver_alive: true,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
