//! Player registration and finish tracking for the shared session
//!
//! This module handles the server-side roster of players, including:
//! - Presence validation of submitted names
//! - Duplicate-registration and double-finish protection
//! - Score derivation when a finish is recorded
//! - Registration-ordered storage backing the leaderboard projection
//!
//! The registry holds every player record of the current session and is
//! wiped whenever a new session starts. Records are never removed
//! individually.

use log::info;
use shared::Player;
use thiserror::Error;

/// User-input failures surfaced directly to the caller of a registration.
///
/// These are terminal responses to the single request that caused them;
/// nothing is retried and no state is mutated when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The request carried no name, or an empty one.
    #[error("Player name required")]
    NameRequired,
    /// A finish was recorded for a name that never registered a start.
    #[error("Player not found")]
    PlayerNotFound,
}

/// Outcome of a start registration.
#[derive(Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new player record was created.
    Started,
    /// A record with this name already exists; it was left untouched.
    AlreadyRegistered,
}

/// Outcome of a finish registration, carrying the player's current record.
#[derive(Debug, PartialEq)]
pub enum FinishOutcome {
    /// The finish time and score were just recorded.
    Finished(Player),
    /// The player had already finished; the stored record is returned
    /// unchanged and the score is never rescaled.
    AlreadyFinished(Player),
}

/// Roster of players registered in the current session
///
/// The registry enforces name uniqueness, keeps records in registration
/// order for the leaderboard's tie-break, and owns every transition of the
/// player lifecycle. Lookups are linear; the roster is a handful of records
/// per session.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Registers a start event for the given name at the given time.
    ///
    /// An empty name is rejected. A name that already registered is
    /// reported as [`StartOutcome::AlreadyRegistered`] without touching the
    /// stored record, so repeating the call never restarts a player's
    /// clock. New records are appended in registration order.
    pub fn register_start(
        &mut self,
        name: &str,
        now_ms: u64,
    ) -> Result<StartOutcome, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::NameRequired);
        }

        if self.find(name).is_some() {
            return Ok(StartOutcome::AlreadyRegistered);
        }

        info!("Player {} started", name);
        self.players.push(Player::new(name, now_ms));
        Ok(StartOutcome::Started)
    }

    /// Registers a finish event for the given name at the given time.
    ///
    /// An empty name is rejected, as is a name that never started. A player
    /// that already finished keeps their original end time and score and is
    /// reported as [`FinishOutcome::AlreadyFinished`]. Otherwise the finish
    /// time is recorded and the score derived from the elapsed seconds.
    pub fn register_finish(
        &mut self,
        name: &str,
        now_ms: u64,
    ) -> Result<FinishOutcome, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::NameRequired);
        }

        let player = self
            .players
            .iter_mut()
            .find(|player| player.name == name)
            .ok_or(RegistryError::PlayerNotFound)?;

        if player.is_finished() {
            return Ok(FinishOutcome::AlreadyFinished(player.clone()));
        }

        player.finish(now_ms);
        info!("Player {} finished with score {}", name, player.score());
        Ok(FinishOutcome::Finished(player.clone()))
    }

    /// Discards every record. Invoked when a new session starts.
    pub fn reset(&mut self) {
        self.players.clear();
    }

    /// All records in registration order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    /// Returns the number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if no players are registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
