//! Forge heat scheduler.
//!
//! While the forge is heating, heat rises by one every tick, independent of
//! player input. The first time it reaches the overheat threshold the
//! blacksmith burns down; a player standing inside at that instant dies and
//! the session ends.
//!
//! [`apply_tick`] is the pure state transition. [`spawn`] runs it on a fixed
//! interval against the session's shared state, taking the same lock the
//! command loop uses, until the session is no longer active.

use std::sync::Arc;
use std::time::Duration;

use forgequest_types::{GameState, LocationId};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::session::SessionCore;

/// Result of a single heat tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is over; the scheduler should stop.
    Inactive,
    /// The forge is not heating; nothing changed.
    Idle,
    /// Heat rose to the contained value.
    Heated {
        /// Heat after the tick.
        heat: u32,
    },
    /// The blacksmith burned down with the player elsewhere.
    BurnedDown {
        /// Heat after the tick.
        heat: u32,
    },
    /// The blacksmith burned down with the player inside. The session is over.
    Fatal {
        /// Heat after the tick.
        heat: u32,
    },
}

impl TickOutcome {
    /// Whether the scheduler loop should exit after this outcome.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Inactive | Self::Fatal { .. })
    }
}

/// Advance the forge by one tick.
///
/// Checks `active` first, then raises the heat if the forge is heating, then
/// evaluates the overheat condition against the location held in `state`
/// at this moment. The burn-down happens at most once.
pub fn apply_tick(state: &mut GameState, overheat_threshold: u32) -> TickOutcome {
    if !state.active {
        return TickOutcome::Inactive;
    }

    let heated = state.is_heating_forge;
    if heated {
        state.heat = state.heat.saturating_add(1);
    }

    if state.heat >= overheat_threshold && !state.blacksmith_burned_down {
        state.blacksmith_burned_down = true;
        state.is_heating_forge = false;
        if state.current_location == LocationId::Blacksmith {
            state.active = false;
            return TickOutcome::Fatal { heat: state.heat };
        }
        return TickOutcome::BurnedDown { heat: state.heat };
    }

    if heated {
        TickOutcome::Heated { heat: state.heat }
    } else {
        TickOutcome::Idle
    }
}

/// Spawn the background heat task.
///
/// The first tick fires one full `interval` after spawning. Ticks that fall
/// behind are delayed rather than bunched.
pub(crate) fn spawn(core: Arc<SessionCore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis(), "Heat scheduler starting");
        let now = Instant::now();
        let mut ticker = tokio::time::interval_at(now.checked_add(interval).unwrap_or(now), interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = core.tick().await;
            if outcome.is_terminal() {
                debug!(?outcome, "Heat scheduler stopping");
                break;
            }
        }
        info!("Heat scheduler stopped");
    })
}
