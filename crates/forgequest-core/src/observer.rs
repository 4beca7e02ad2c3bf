//! Telemetry collaborator interface.
//!
//! The core reports what happens through an [`Observer`] but never depends on
//! it for control flow. Implementations must not block and cannot fail; a
//! missing telemetry backend is simply an observer that drops everything.
//!
//! Gauge-style values are exposed separately through [`Gauges`], a pair of
//! atomics refreshed after every critical section. A collaborator can poll
//! them at any rate without ever touching the game-state lock.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use forgequest_types::GameState;
use tracing::{error, info, warn};

/// Receiver of narrative and diagnostic notices emitted by the core.
pub trait Observer: Send + Sync {
    /// Narrative text returned to the player.
    fn on_narrative(&self, text: &str);
    /// Something risky happened (forge overheating, a death in town).
    fn on_warning(&self, text: &str);
    /// Something failed (a melted sword, a misconfigured action).
    fn on_error(&self, text: &str);
    /// The session is ending abnormally.
    fn on_critical(&self, text: &str);
}

/// Observer that forwards every notice to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_narrative(&self, text: &str) {
        info!(text, "narrative");
    }

    fn on_warning(&self, text: &str) {
        warn!(text, "game warning");
    }

    fn on_error(&self, text: &str) {
        error!(text, "game error");
    }

    fn on_critical(&self, text: &str) {
        error!(text, critical = true, "game critical");
    }
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl Observer for NoOpObserver {
    fn on_narrative(&self, _text: &str) {}
    fn on_warning(&self, _text: &str) {}
    fn on_error(&self, _text: &str) {}
    fn on_critical(&self, _text: &str) {}
}

/// Lock-free mirror of the values a metrics exporter polls.
#[derive(Debug, Default)]
pub struct Gauges {
    /// Last published forge heat.
    heat: AtomicU32,
    /// Last published plain-sword flag.
    has_sword: AtomicBool,
}

impl Gauges {
    /// Create gauges reading zero.
    pub const fn new() -> Self {
        Self {
            heat: AtomicU32::new(0),
            has_sword: AtomicBool::new(false),
        }
    }

    /// Copy the gauge values out of `state`. Called with the state lock held.
    pub fn publish(&self, state: &GameState) {
        self.heat.store(state.heat, Ordering::Release);
        self.has_sword.store(state.has_sword, Ordering::Release);
    }

    /// Forge heat as of the last critical section.
    pub fn current_heat(&self) -> u32 {
        self.heat.load(Ordering::Acquire)
    }

    /// `1` if the player held a plain sword as of the last critical section.
    pub fn has_sword(&self) -> u8 {
        u8::from(self.has_sword.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauges_mirror_published_state() {
        let gauges = Gauges::new();
        assert_eq!(gauges.current_heat(), 0);
        assert_eq!(gauges.has_sword(), 0);

        let mut state = GameState::new();
        state.heat = 37;
        state.has_sword = true;
        gauges.publish(&state);

        assert_eq!(gauges.current_heat(), 37);
        assert_eq!(gauges.has_sword(), 1);
    }

    #[test]
    fn gauges_ignore_unpublished_changes() {
        let gauges = Gauges::new();
        let mut state = GameState::new();
        gauges.publish(&state);
        state.heat = 80;
        assert_eq!(gauges.current_heat(), 0);
    }
}
