//! HTTP transport mapping routes onto the in-memory game state

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use shared::{
    ErrorBody, MessageResponse, NameRequest, PlayerResponse, PlayerView, RankedPlayer,
    SessionResponse, SessionStatus,
};

use crate::game::GameState;
use crate::persistence::MongoStore;
use crate::registry::{FinishOutcome, RegistryError, StartOutcome};
use crate::utils::get_timestamp;

pub type SharedState = Arc<AppState>;

/// Central application state shared across request handlers.
///
/// Session and roster mutations all go through the single `game` lock;
/// handlers never hold it across I/O.
pub struct AppState {
    game: RwLock<GameState>,
    mongo: RwLock<Option<MongoStore>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be
    /// cloned cheaply. The state starts degraded until the persistence
    /// connector installs a store.
    pub fn new() -> SharedState {
        Arc::new(Self {
            game: RwLock::new(GameState::new()),
            mongo: RwLock::new(None),
        })
    }

    /// Install the store once the connector establishes a connection.
    pub async fn install_mongo(&self, store: MongoStore) {
        let mut guard = self.mongo.write().await;
        *guard = Some(store);
    }

    /// True until a persistence connection is installed. The in-memory
    /// routes serve regardless.
    pub async fn is_degraded(&self) -> bool {
        self.mongo.read().await.is_none()
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = match self {
            RegistryError::NameRequired => StatusCode::BAD_REQUEST,
            RegistryError::PlayerNotFound => StatusCode::NOT_FOUND,
        };
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/session", get(get_session))
        .route("/session/start", post(start_session))
        .route("/session/end", post(end_session))
        .route("/player/start", post(player_start))
        .route("/player/end", post(player_end))
        .route("/admin/players", get(ranked_players))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> &'static str {
    "Jigsaw Puzzle API is running..."
}

async fn get_session(State(state): State<SharedState>) -> Json<SessionStatus> {
    let game = state.game.read().await;
    Json(SessionStatus {
        session: game.session(),
    })
}

async fn start_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    let session = state.game.write().await.start_session(get_timestamp());
    Json(SessionResponse {
        message: "Session started".to_string(),
        session,
    })
}

async fn end_session(State(state): State<SharedState>) -> Json<SessionResponse> {
    let session = state.game.write().await.end_session(get_timestamp());
    Json(SessionResponse {
        message: "Session ended".to_string(),
        session,
    })
}

// The body is extracted as an Option so that a missing or malformed body
// reaches the registry's presence check and surfaces as 400, not as an
// extractor rejection.
async fn player_start(
    State(state): State<SharedState>,
    payload: Option<Json<NameRequest>>,
) -> Result<Json<MessageResponse>, RegistryError> {
    let name = submitted_name(&payload);
    let outcome = state
        .game
        .write()
        .await
        .register_start(name, get_timestamp())?;

    let message = match outcome {
        StartOutcome::Started => "Player started",
        StartOutcome::AlreadyRegistered => "Player already registered",
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

async fn player_end(
    State(state): State<SharedState>,
    payload: Option<Json<NameRequest>>,
) -> Result<Json<PlayerResponse>, RegistryError> {
    let name = submitted_name(&payload);
    let outcome = state
        .game
        .write()
        .await
        .register_finish(name, get_timestamp())?;

    let (message, player) = match outcome {
        FinishOutcome::Finished(player) => ("Player finished", player),
        FinishOutcome::AlreadyFinished(player) => ("Player already finished", player),
    };
    Ok(Json(PlayerResponse {
        message: message.to_string(),
        player: PlayerView::from(&player),
    }))
}

async fn ranked_players(State(state): State<SharedState>) -> Json<Vec<RankedPlayer>> {
    let game = state.game.read().await;
    Json(game.ranked_players())
}

fn submitted_name(payload: &Option<Json<NameRequest>>) -> &str {
    payload
        .as_ref()
        .and_then(|Json(request)| request.name.as_deref())
        .unwrap_or_default()
}
