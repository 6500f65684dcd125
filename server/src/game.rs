use log::info;
use shared::{rank_players, RankedPlayer, Session};

use crate::registry::{FinishOutcome, PlayerRegistry, RegistryError, StartOutcome};

/// Owner of the session singleton and the player roster. All mutations of
/// either go through this type.
#[derive(Debug, Default)]
pub struct GameState {
    session: Session,
    registry: PlayerRegistry,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            session: Session::default(),
            registry: PlayerRegistry::new(),
        }
    }

    /// Snapshot of the current session record.
    pub fn session(&self) -> Session {
        self.session.clone()
    }

    /// Opens a new session window and wipes the roster. Calling this while
    /// a session is already running restarts the clock and wipes the roster
    /// again; there is no error case.
    pub fn start_session(&mut self, now_ms: u64) -> Session {
        self.session.started = true;
        self.session.start_time_ms = Some(now_ms);
        self.session.end_time_ms = None;
        self.registry.reset();

        info!("Session started");
        self.session.clone()
    }

    /// Closes the session window. An end time is recorded even when no
    /// session was started.
    pub fn end_session(&mut self, now_ms: u64) -> Session {
        self.session.started = false;
        self.session.end_time_ms = Some(now_ms);

        info!("Session ended");
        self.session.clone()
    }

    pub fn register_start(
        &mut self,
        name: &str,
        now_ms: u64,
    ) -> Result<StartOutcome, RegistryError> {
        self.registry.register_start(name, now_ms)
    }

    pub fn register_finish(
        &mut self,
        name: &str,
        now_ms: u64,
    ) -> Result<FinishOutcome, RegistryError> {
        self.registry.register_finish(name, now_ms)
    }

    /// Leaderboard projection over the current roster.
    pub fn ranked_players(&self) -> Vec<RankedPlayer> {
        rank_players(self.registry.players())
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }
}
