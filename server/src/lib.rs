//! # Jigsaw Session Server Library
//!
//! This library implements the session/leaderboard service for the timed
//! jigsaw-puzzle game. An administrator opens and closes a single shared
//! session, players register start and finish events by name, and integer
//! scores are derived from elapsed time.
//!
//! ## Core Responsibilities
//!
//! ### Session Lifecycle
//! A single in-process session window is opened and closed by admin
//! requests. Opening a session always discards the previous roster, so a
//! restart is equivalent to a fresh session.
//!
//! ### Player Roster
//! Players join the running session with a start event and close their run
//! with a finish event. Registration is duplicate-safe and finishing is
//! idempotent: repeated calls return the stored record untouched.
//!
//! ### Scoring and Ranking
//! A finish derives `max(0, round(100 - elapsed_seconds))` from the
//! player's own start time. The leaderboard orders players by descending
//! score; players still in play carry the `"-"` sentinel instead of a
//! numeric rank.
//!
//! ## Architecture Design
//!
//! ### Single Lock Around Mutable State
//! Handlers run on a multi-threaded tokio runtime, so the session record
//! and roster live behind one `RwLock` inside the shared application
//! state. Every mutation takes the write lock; projections take the read
//! lock. No handler holds the lock across I/O.
//!
//! ### HTTP/JSON Transport
//! Routes are served by axum with permissive CORS. User-input failures map
//! to structured `{"error": ...}` bodies with 400/404 status codes; every
//! other operation is total.
//!
//! ### Detached Persistence
//! The MongoDB layer stores puzzle configurations only and is connected by
//! a background task. A missing connection string or an unreachable
//! database degrades persistence without touching the request path.
//!
//! ## Module Organization
//!
//! ### Registry Module (`registry`)
//! The player roster: name validation, duplicate-registration and
//! double-finish protection, score derivation, registration order.
//!
//! ### Game Module (`game`)
//! Owner of the session record and the roster: start/end transitions and
//! the leaderboard projection.
//!
//! ### HTTP Module (`http`)
//! Shared application state, router construction, and request handlers.
//!
//! ### Persistence Module (`persistence`)
//! MongoDB store for puzzle configurations and the background connector.

pub mod game;
pub mod http;
pub mod persistence;
pub mod registry;
pub mod utils;
