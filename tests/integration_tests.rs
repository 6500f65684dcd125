//! Integration tests for the jigsaw session/leaderboard API
//!
//! These tests drive the full router end to end, request to response.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::http::{router, AppState};
use shared::{RankedPlayer, SessionResponse, SessionStatus};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new())
}

/// Sends one request through the router and returns the status plus the
/// body, parsed as JSON when possible.
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

/// APPLICATION STATE TESTS
mod state_tests {
    use super::*;

    #[tokio::test]
    async fn state_starts_degraded_and_serves_anyway() {
        let state = AppState::new();
        assert!(state.is_degraded().await);

        let app = router(state);
        let (status, _) = send(&app, "GET", "/session", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

/// SESSION LIFECYCLE TESTS
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn index_reports_running() {
        let app = app();
        let (status, body) = send(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("Jigsaw Puzzle API is running...".to_string()));
    }

    #[tokio::test]
    async fn initial_session_is_unstarted() {
        let app = app();
        let (status, body) = send(&app, "GET", "/session", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"session": {"started": false, "startTime": null, "endTime": null}})
        );

        let parsed: SessionStatus = serde_json::from_value(body).unwrap();
        assert!(!parsed.session.started);
    }

    #[tokio::test]
    async fn start_session_opens_window() {
        let app = app();
        let (status, body) = send(&app, "POST", "/session/start", None).await;

        assert_eq!(status, StatusCode::OK);
        let parsed: SessionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.message, "Session started");
        assert!(parsed.session.started);
        assert!(parsed.session.start_time_ms.is_some());
        assert_eq!(parsed.session.end_time_ms, None);
    }

    #[tokio::test]
    async fn end_session_records_end_time() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        let (status, body) = send(&app, "POST", "/session/end", None).await;

        assert_eq!(status, StatusCode::OK);
        let parsed: SessionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.message, "Session ended");
        assert!(!parsed.session.started);
        assert!(parsed.session.start_time_ms.is_some());
        assert!(parsed.session.end_time_ms.is_some());
    }

    #[tokio::test]
    async fn end_without_start_still_records_end_time() {
        let app = app();
        let (status, body) = send(&app, "POST", "/session/end", None).await;

        assert_eq!(status, StatusCode::OK);
        let parsed: SessionResponse = serde_json::from_value(body).unwrap();
        assert!(!parsed.session.started);
        assert_eq!(parsed.session.start_time_ms, None);
        assert!(parsed.session.end_time_ms.is_some());
    }

    #[tokio::test]
    async fn restart_wipes_roster_and_end_time() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Bob"}))).await;
        send(&app, "POST", "/session/end", None).await;

        let (_, body) = send(&app, "POST", "/session/start", None).await;
        let parsed: SessionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.session.end_time_ms, None);

        let (status, players) = send(&app, "GET", "/admin/players", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(players, json!([]));
    }
}

/// PLAYER LIFECYCLE TESTS
mod player_tests {
    use super::*;

    #[tokio::test]
    async fn player_start_registers() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;

        let (status, body) =
            send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Player started"}));
    }

    #[tokio::test]
    async fn duplicate_start_reports_already_registered() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        let (status, body) =
            send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Player already registered"}));

        let (_, players) = send(&app, "GET", "/admin/players", None).await;
        assert_eq!(players.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;

        for body in [Some(json!({})), Some(json!({"name": ""})), None] {
            let (status, response) = send(&app, "POST", "/player/start", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response, json!({"error": "Player name required"}));
        }

        let (status, response) = send(&app, "POST", "/player/end", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Player name required"}));
    }

    #[tokio::test]
    async fn finish_unknown_player_is_not_found() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;

        let (status, body) =
            send(&app, "POST", "/player/end", Some(json!({"name": "Ghost"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Player not found"}));
    }

    #[tokio::test]
    async fn finish_derives_score_from_elapsed_time() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        let (status, body) =
            send(&app, "POST", "/player/end", Some(json!({"name": "Alice"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Player finished"));
        assert_eq!(body["player"]["name"], json!("Alice"));
        assert!(body["player"]["endTime"].is_u64());

        // The run completes within the test, so the elapsed time rounds to
        // at most a second.
        let score = body["player"]["score"].as_i64().unwrap();
        assert!((99..=100).contains(&score), "unexpected score {}", score);
    }

    #[tokio::test]
    async fn finish_twice_is_idempotent() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        let (_, first) = send(&app, "POST", "/player/end", Some(json!({"name": "Alice"}))).await;
        let (status, second) =
            send(&app, "POST", "/player/end", Some(json!({"name": "Alice"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["message"], json!("Player already finished"));
        assert_eq!(second["player"]["endTime"], first["player"]["endTime"]);
        assert_eq!(second["player"]["score"], first["player"]["score"]);
    }

    #[tokio::test]
    async fn player_can_register_without_a_session() {
        // Registration is not gated on a running session window.
        let app = app();

        let (status, body) =
            send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Player started"}));
    }
}

/// RANKING TESTS
mod ranking_tests {
    use super::*;

    #[tokio::test]
    async fn empty_roster_ranks_to_empty_array() {
        let app = app();
        let (status, body) = send(&app, "GET", "/admin/players", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn finished_players_rank_above_unfinished() {
        let app = app();
        send(&app, "POST", "/session/start", None).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Alice"}))).await;
        send(&app, "POST", "/player/start", Some(json!({"name": "Bob"}))).await;
        send(&app, "POST", "/player/end", Some(json!({"name": "Bob"}))).await;

        let (status, body) = send(&app, "GET", "/admin/players", None).await;
        assert_eq!(status, StatusCode::OK);

        let ranked: Vec<RankedPlayer> = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].player.name, "Bob");
        assert_eq!(ranked[1].player.name, "Alice");

        // Bob finished and holds rank 1; Alice is still in play and carries
        // the sentinel while occupying the second slot.
        assert_eq!(body[0]["rank"], json!(1));
        assert_eq!(body[1]["rank"], json!("-"));
        assert_eq!(body[1]["endTime"], json!(null));
        assert_eq!(body[1]["score"], json!(0));
    }
}
