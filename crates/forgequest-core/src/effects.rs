//! Named effects that mutate [`GameState`] and produce narrative.
//!
//! Every function here runs while the session lock is held, so none of them
//! may block. They are not idempotent: calling an effect twice can have a
//! cumulative result (a second melted sword, for example).

use forgequest_types::{Effect, GameState, LocationId};
use tracing::debug;

use crate::observer::Observer;

/// Lowest heat at which a sword can be drawn from the forge.
pub const SWORD_READY_MIN: u32 = 20;

/// Highest heat at which a sword survives the forge.
pub const SWORD_READY_MAX: u32 = 40;

/// Failed attempts after which the blacksmith refuses further requests.
pub const REFUSAL_ATTEMPTS: u32 = 2;

/// Run `effect` against `state`, returning its narrative.
pub fn apply(effect: Effect, state: &mut GameState, observer: &dyn Observer) -> String {
    debug!(?effect, heat = state.heat, "applying effect");
    match effect {
        Effect::RequestSword => request_sword(state, observer),
        Effect::HeatForge => heat_forge(state),
        Effect::CoolForge => cool_forge(state),
        Effect::CheckSword => check_sword(state, observer),
        Effect::Cheat => cheat(state, observer),
        Effect::PriestBlessing => priest_blessing(state, observer),
        Effect::EvilEnchant => evil_enchant(state),
        Effect::QuestGiver => quest_giver(state, observer),
    }
}

/// Ask for a sword. At two or more failures the refusal wins.
fn request_sword(state: &mut GameState, observer: &dyn Observer) -> String {
    if state.has_sword {
        return "The blacksmith laughs. \"You already carry one of my swords!\"".to_owned();
    }

    match state.failed_sword_attempts {
        0 => {
            state.sword_requested = true;
            "The blacksmith nods. \"Heat the forge, but mind the temperature. \
             Check the blade when it's ready.\""
                .to_owned()
        }
        n if n >= REFUSAL_ATTEMPTS => "The blacksmith folds their arms. \"You've ruined enough \
             of my steel. Find another smith.\""
            .to_owned(),
        _ => {
            state.sword_requested = true;
            if state.is_heating_forge {
                observer.on_warning("sword requested again while the forge is still heating");
            }
            "The blacksmith sighs. \"One more try. Don't let it melt this time.\"".to_owned()
        }
    }
}

fn heat_forge(state: &mut GameState) -> String {
    state.is_heating_forge = true;
    format!(
        "The coals roar to life and the forge begins to heat up. (heat: {})",
        state.heat
    )
}

fn cool_forge(state: &mut GameState) -> String {
    state.heat = 0;
    state.is_heating_forge = false;
    "Steam hisses as the forge cools completely.".to_owned()
}

/// Total over `heat`: ready window, melted above it, not ready below it.
fn check_sword(state: &mut GameState, observer: &dyn Observer) -> String {
    let heat = state.heat;
    if (SWORD_READY_MIN..=SWORD_READY_MAX).contains(&heat) {
        state.sword_requested = false;
        state.has_sword = true;
        format!("The sword is ready! You lift the gleaming blade from the anvil. (heat: {heat})")
    } else if heat > SWORD_READY_MAX {
        state.sword_requested = false;
        state.failed_sword_attempts = state.failed_sword_attempts.saturating_add(1);
        observer.on_error("sword melted in the forge");
        format!(
            "Oh no! The forge was too hot and the sword has completely melted. (heat: {heat})"
        )
    } else {
        format!("The metal is still too cold to shape. Give the forge more time. (heat: {heat})")
    }
}

fn cheat(state: &mut GameState, observer: &dyn Observer) -> String {
    state.has_sword = true;
    observer.on_warning("sword granted by cheat");
    "A sword materializes in your hand.".to_owned()
}

/// Bless a plain sword, or lift the curse from an evil one at the priest's cost.
fn priest_blessing(state: &mut GameState, observer: &dyn Observer) -> String {
    if state.has_sword {
        state.has_holy_sword = true;
        "The priest blesses your sword. It glows with a soft, holy light.".to_owned()
    } else if state.has_evil_sword {
        state.has_evil_sword = false;
        state.has_holy_sword = true;
        state.priest_alive = false;
        observer.on_warning("the priest died lifting the curse");
        "The priest grasps the cursed blade and draws the darkness into their own body. The sword \
         shines holy once more, but the priest collapses, lifeless."
            .to_owned()
    } else {
        "The priest smiles. \"Return when you carry a blade worth blessing.\"".to_owned()
    }
}

fn evil_enchant(state: &mut GameState) -> String {
    state.has_sword = false;
    state.has_evil_sword = true;
    "Dark runes crawl across the steel. Your sword now hums with evil power.".to_owned()
}

/// Sword priority: evil, then holy, then plain, then none.
fn quest_giver(state: &mut GameState, observer: &dyn Observer) -> String {
    if state.has_evil_sword {
        state.quest_giver_alive = false;
        state.quest_accepted = false;
        state.current_location = LocationId::Town;
        observer.on_warning("the quest giver was slain by the evil sword");
        "The quest giver sees your cursed sword and recoils, but the blade strikes on its \
         own. The quest giver falls dead, and guards drag you back to the town square."
            .to_owned()
    } else if state.has_holy_sword {
        state.quest_accepted = true;
        "The quest giver bows before your holy sword. \"You are the one. The quest is yours.\""
            .to_owned()
    } else if state.has_sword {
        "The quest giver inspects your sword. \"A fine blade, but this quest needs a \
         blessed one. Visit the chapel.\""
            .to_owned()
    } else {
        "The quest giver shakes their head. \"Come back when you have a sword.\"".to_owned()
    }
}
