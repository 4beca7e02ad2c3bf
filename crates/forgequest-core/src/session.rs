//! Game session lifecycle and command processing.
//!
//! A [`GameSession`] exclusively owns the [`GameState`] of one playthrough
//! behind a single [`tokio::sync::Mutex`]. The foreground command path and
//! the background heat scheduler both take that lock for every read and
//! write, so the overheat check always sees the player's location as of the
//! moment it runs.
//!
//! The session ends in one of three ways, reported as an [`EndReason`]:
//! the player quits, the forge burns the player to death, or the host shuts
//! the session down. The reason is published on a watch channel so a
//! front-end blocked on input can learn of a death without issuing another
//! command.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use forgequest_types::GameState;
use forgequest_world::WorldGraph;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::HeatConfig;
use crate::observer::{Gauges, Observer};
use crate::resolver::{self, ResolutionKind};
use crate::scheduler::{self, TickOutcome};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// The player typed `quit` or `exit`.
    PlayerQuit,
    /// The forge overheated with the player inside the blacksmith.
    BurnedToDeath,
    /// The host called [`GameSession::shutdown`].
    Shutdown,
}

impl EndReason {
    /// Whether the session ended abnormally.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::BurnedToDeath)
    }
}

/// Errors returned by [`GameSession::process_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session is over and accepts no further commands.
    #[error("session has ended: {0:?}")]
    Ended(EndReason),
}

/// Result of processing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The session continues.
    Continue(String),
    /// This command ended the session.
    Ended {
        /// Final narrative for the player.
        narrative: String,
        /// Why the session ended.
        reason: EndReason,
    },
}

impl Turn {
    /// The narrative text of this turn.
    pub fn narrative(&self) -> &str {
        match self {
            Self::Continue(text) | Self::Ended { narrative: text, .. } => text,
        }
    }
}

/// Final narrative line for a fiery death.
pub const DEATH_BY_FIRE: &str =
    "The forge explodes in a roaring blaze! The blacksmith burns down around you. You have died.";

/// State shared between the session handle and the scheduler task.
pub(crate) struct SessionCore {
    /// The immutable world map.
    graph: WorldGraph,
    /// The single lock over all dynamic state.
    state: Mutex<GameState>,
    /// Telemetry collaborator.
    observer: Arc<dyn Observer>,
    /// Lock-free gauge mirror.
    gauges: Arc<Gauges>,
    /// End reason publisher; `None` while the session runs.
    end_tx: watch::Sender<Option<EndReason>>,
    /// Heat at which the blacksmith burns down.
    overheat_threshold: u32,
}

impl SessionCore {
    /// Run one heat tick under the state lock.
    pub(crate) async fn tick(&self) -> TickOutcome {
        let outcome = {
            let mut state = self.state.lock().await;
            let outcome = scheduler::apply_tick(&mut state, self.overheat_threshold);
            self.gauges.publish(&state);
            if matches!(outcome, TickOutcome::Fatal { .. }) {
                self.finish(EndReason::BurnedToDeath);
            }
            outcome
        };

        match outcome {
            TickOutcome::Fatal { heat } => {
                warn!(heat, "Blacksmith burned down with the player inside");
                self.observer.on_critical(DEATH_BY_FIRE);
            }
            TickOutcome::BurnedDown { heat } => {
                info!(heat, "Blacksmith burned down");
                self.observer
                    .on_warning("The forge overheated and the blacksmith burned down.");
            }
            TickOutcome::Heated { heat } => debug!(heat, "Forge heated"),
            TickOutcome::Idle | TickOutcome::Inactive => {}
        }
        outcome
    }

    /// Record the end reason if none is set yet. Call with the state lock
    /// held so the reason is visible before `active == false` is observed.
    fn finish(&self, reason: EndReason) {
        self.end_tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    fn end_reason(&self) -> Option<EndReason> {
        *self.end_tx.borrow()
    }
}

/// One running playthrough.
pub struct GameSession {
    /// State shared with the scheduler task.
    core: Arc<SessionCore>,
    /// Background heat task, if one was started.
    scheduler: Mutex<Option<JoinHandle<()>>>,
    /// Wall-clock time when the session started.
    started_at: DateTime<Utc>,
}

impl GameSession {
    /// Start a session from the initial state.
    ///
    /// Returns the session and the opening text (first description and
    /// action listing). Must be called from within a Tokio runtime when
    /// `config.tick_interval_ms > 0`, since the heat scheduler is spawned
    /// immediately.
    pub fn start(
        config: &HeatConfig,
        graph: WorldGraph,
        observer: Arc<dyn Observer>,
    ) -> (Self, String) {
        Self::start_with_state(config, graph, GameState::new(), observer)
    }

    /// Start a session from a prepared state.
    pub fn start_with_state(
        config: &HeatConfig,
        graph: WorldGraph,
        state: GameState,
        observer: Arc<dyn Observer>,
    ) -> (Self, String) {
        let opening = resolver::describe(&graph, &state);
        let gauges = Arc::new(Gauges::new());
        gauges.publish(&state);
        let (end_tx, _) = watch::channel(None);

        let core = Arc::new(SessionCore {
            graph,
            state: Mutex::new(state),
            observer,
            gauges,
            end_tx,
            overheat_threshold: config.overheat_threshold,
        });

        let scheduler = if config.tick_interval_ms > 0 {
            Some(scheduler::spawn(
                Arc::clone(&core),
                Duration::from_millis(config.tick_interval_ms),
            ))
        } else {
            info!("Heat scheduler disabled, ticks are driven manually");
            None
        };

        core.observer.on_narrative(&opening);
        info!(
            tick_interval_ms = config.tick_interval_ms,
            overheat_threshold = config.overheat_threshold,
            "Session started"
        );

        let session = Self {
            core,
            scheduler: Mutex::new(scheduler),
            started_at: Utc::now(),
        };
        (session, opening)
    }

    /// Process one player command.
    ///
    /// Per-command problems (unknown command, failed prerequisite) come back
    /// as narrative inside [`Turn::Continue`]. A quit comes back as
    /// [`Turn::Ended`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ended`] if the session was already over
    /// before this command, including a death caused by the scheduler.
    pub async fn process_command(&self, raw: &str) -> Result<Turn, SessionError> {
        let (resolution, ended) = {
            let mut state = self.core.state.lock().await;
            if !state.active {
                let reason = self.core.end_reason().unwrap_or(EndReason::Shutdown);
                return Err(SessionError::Ended(reason));
            }
            let resolution =
                resolver::resolve(&self.core.graph, &mut state, raw, &*self.core.observer);
            self.core.gauges.publish(&state);
            if !state.active {
                self.core.finish(EndReason::PlayerQuit);
            }
            (resolution, !state.active)
        };

        debug!(command = raw, kind = ?resolution.kind, "Command resolved");
        self.core.observer.on_narrative(&resolution.narrative);

        if ended {
            let reason = self.core.end_reason().unwrap_or(EndReason::PlayerQuit);
            return Ok(Turn::Ended {
                narrative: resolution.narrative,
                reason,
            });
        }
        if resolution.kind == ResolutionKind::Quit {
            warn!("Quit resolved without ending the session");
        }
        Ok(Turn::Continue(resolution.narrative))
    }

    /// Description and action listing for the current location.
    pub async fn describe(&self) -> String {
        let state = self.core.state.lock().await;
        resolver::describe(&self.core.graph, &state)
    }

    /// Run one heat tick now, under the same lock as the scheduler.
    ///
    /// Used when the background scheduler is disabled, and by tests that
    /// need deterministic heat.
    pub async fn tick_heat(&self) -> TickOutcome {
        self.core.tick().await
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> GameState {
        self.core.state.lock().await.clone()
    }

    /// Gauges for a metrics collaborator to poll.
    pub fn gauges(&self) -> Arc<Gauges> {
        Arc::clone(&self.core.gauges)
    }

    /// The end reason, if the session is over.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.core.end_reason()
    }

    /// Wait until the session ends and return why.
    pub async fn wait_for_end(&self) -> EndReason {
        let mut rx = self.core.end_tx.subscribe();
        let reason = rx.wait_for(Option::is_some).await.ok().and_then(|r| *r);
        reason.unwrap_or(EndReason::Shutdown)
    }

    /// Return elapsed seconds since the session started.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// End the session and stop the scheduler. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        {
            let mut state = self.core.state.lock().await;
            state.active = false;
            self.core.gauges.publish(&state);
            self.core.finish(EndReason::Shutdown);
        }

        let handle = self.scheduler.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Heat scheduler task failed");
                }
            }
        }
        debug!("Session shut down");
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(handle) = self.scheduler.get_mut().take() {
            handle.abort();
        }
    }
}

/// Log the session end sequence.
pub fn log_session_end(reason: EndReason, state: &GameState, elapsed_seconds: u64) {
    info!(
        reason = ?reason,
        elapsed_seconds,
        location = %state.current_location,
        heat = state.heat,
        failed_sword_attempts = state.failed_sword_attempts,
        quest_accepted = state.quest_accepted,
        "Session ended"
    );
    if reason.is_fatal() {
        warn!("Session ended with the player's death");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use forgequest_types::LocationId;
    use forgequest_world::create_starting_world;

    use super::*;
    use crate::observer::NoOpObserver;

    fn manual() -> HeatConfig {
        HeatConfig {
            tick_interval_ms: 0,
            overheat_threshold: 100,
        }
    }

    fn session_with(state: GameState) -> GameSession {
        let graph = create_starting_world().unwrap();
        GameSession::start_with_state(&manual(), graph, state, Arc::new(NoOpObserver)).0
    }

    #[tokio::test]
    async fn opening_text_lists_start_actions() {
        let graph = create_starting_world().unwrap();
        let (session, opening) = GameSession::start(&manual(), graph, Arc::new(NoOpObserver));
        assert!(opening.starts_with("You are at the beginning"));
        assert!(opening.ends_with("Available actions: go north, cheat, look around"));
        assert_eq!(session.describe().await, opening);
        assert_eq!(session.end_reason(), None);
    }

    #[tokio::test]
    async fn quit_ends_and_blocks_further_commands() {
        let session = session_with(GameState::new());
        let turn = session.process_command("Exit").await.unwrap();
        assert_eq!(
            turn,
            Turn::Ended {
                narrative: String::from(resolver::FAREWELL),
                reason: EndReason::PlayerQuit,
            }
        );
        assert_eq!(
            session.process_command("go north").await,
            Err(SessionError::Ended(EndReason::PlayerQuit))
        );
        assert_eq!(session.wait_for_end().await, EndReason::PlayerQuit);
    }

    #[tokio::test]
    async fn fatal_tick_ends_session() {
        let mut state = GameState::new();
        state.current_location = LocationId::Blacksmith;
        state.heat = 99;
        state.is_heating_forge = true;
        let session = session_with(state);

        assert_eq!(session.tick_heat().await, TickOutcome::Fatal { heat: 100 });
        assert_eq!(session.end_reason(), Some(EndReason::BurnedToDeath));
        assert!(!session.snapshot().await.active);
        assert_eq!(
            session.process_command("cool forge").await,
            Err(SessionError::Ended(EndReason::BurnedToDeath))
        );
    }

    #[tokio::test]
    async fn shutdown_is_idempotent_and_keeps_first_reason() {
        let session = session_with(GameState::new());
        session.process_command("quit").await.unwrap();
        session.shutdown().await;
        session.shutdown().await;
        assert_eq!(session.end_reason(), Some(EndReason::PlayerQuit));
    }

    #[tokio::test]
    async fn shutdown_marks_inactive() {
        let session = session_with(GameState::new());
        session.shutdown().await;
        assert_eq!(session.end_reason(), Some(EndReason::Shutdown));
        assert!(!session.snapshot().await.active);
        assert_eq!(session.tick_heat().await, TickOutcome::Inactive);
    }

    #[tokio::test]
    async fn gauges_follow_commands() {
        let session = session_with(GameState::new());
        let gauges = session.gauges();
        assert_eq!(gauges.has_sword(), 0);
        session.process_command("cheat").await.unwrap();
        assert_eq!(gauges.has_sword(), 1);
    }

    #[test]
    fn turn_narrative_accessor() {
        assert_eq!(Turn::Continue(String::from("a")).narrative(), "a");
        let ended = Turn::Ended {
            narrative: String::from("b"),
            reason: EndReason::PlayerQuit,
        };
        assert_eq!(ended.narrative(), "b");
        assert!(!EndReason::PlayerQuit.is_fatal());
        assert!(EndReason::BurnedToDeath.is_fatal());
    }
}
