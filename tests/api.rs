//! End-to-end tests against the router backed by the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use snake_showdown::{router, AppState, MemoryStore, ServerConfig};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(ServerConfig::default(), Arc::new(MemoryStore::new())).unwrap();
    router(Arc::new(state))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn signup(app: &Router, username: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": username, "email": email, "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

fn live_player(id: &str) -> Value {
    json!({
        "id": id,
        "username": "Watcher",
        "score": 0,
        "mode": "walls",
        "snake": [{ "x": 3, "y": 3 }, { "x": 2, "y": 3 }],
        "food": { "x": 9, "y": 9 },
        "direction": "RIGHT",
        "status": "playing"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_signup_login_me() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "alice", "email": "a@x.com", "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");

    let (status, body) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully logged out");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let app = app();
    signup(&app, "alice", "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "alice2", "email": "a@x.com", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = app();
    signup(&app, "alice", "a@x.com").await;

    let (wrong_pw, wrong_pw_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "nope" })),
    )
    .await;
    let (unknown, unknown_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ghost@x.com", "password": "pw123" })),
    )
    .await;

    assert_eq!(wrong_pw, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_tokens() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/leaderboard",
        Some("garbage"),
        Some(json!({ "score": 10, "mode": "walls" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_leaderboard_submit_and_filter() {
    let app = app();
    let token = signup(&app, "alice", "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/leaderboard",
        Some(&token),
        Some(json!({ "score": 100, "mode": "walls" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["score"], 100);
    assert_eq!(body["mode"], "walls");

    for (score, mode) in [(250, "pass-through"), (40, "walls")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/leaderboard",
            Some(&token),
            Some(json!({ "score": score, "mode": mode })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(&app, Method::GET, "/leaderboard?mode=walls", None, None).await;
    let scores: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![100, 40]);

    let (_, body) = send(&app, Method::GET, "/leaderboard?limit=1", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["score"], 250);

    let (status, _) = send(&app, Method::GET, "/leaderboard?mode=maze", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_live_player_lifecycle() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/live-players",
        None,
        Some(live_player("session-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["last_updated"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/live-players",
        None,
        Some(live_player("session-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut moved = live_player("session-1");
    moved["score"] = json!(30);
    moved["direction"] = json!("DOWN");
    let (status, body) = send(
        &app,
        Method::PUT,
        "/live-players/session-1",
        None,
        Some(moved.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 30);
    assert_eq!(body["direction"], "DOWN");
    assert_eq!(body["username"], "Watcher");

    let (status, _) = send(&app, Method::PUT, "/live-players/ghost", None, Some(moved)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/live-players", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, "/live-players/session-1", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, "/live-players/session-1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/live-players/session-1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Player not found");
}

#[tokio::test]
async fn test_rpg_ties_broken_by_time() {
    let app = app();
    let token = signup(&app, "alice", "a@x.com").await;
    let other = signup(&app, "bob", "b@x.com").await;

    for (token, time) in [(&token, 30.0), (&other, 20.0)] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/rpg/leaderboard",
            Some(token),
            Some(json!({ "level_id": 3, "score": 500, "time_seconds": time })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["level_id"], 3);
    }

    let (status, body) = send(&app, Method::GET, "/rpg/leaderboard/3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["rank"], 1);
    assert_eq!(body[0]["username"], "bob");
    assert_eq!(body[1]["rank"], 2);
    assert_eq!(body[1]["username"], "alice");

    let (_, body) = send(&app, Method::GET, "/rpg/leaderboard/4", None, None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_rpg_level_out_of_range() {
    let app = app();
    let token = signup(&app, "alice", "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/rpg/leaderboard",
        Some(&token),
        Some(json!({ "level_id": 21, "score": 10, "time_seconds": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, _) = send(&app, Method::GET, "/rpg/leaderboard/21", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/rpg/leaderboard/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");
}

#[tokio::test]
async fn test_rpg_submit_from_query_string() {
    let app = app();
    let token = signup(&app, "alice", "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/rpg/leaderboard?level_id=2&score=50&time_seconds=12.5",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["level_id"], 2);
    assert_eq!(body["score"], 50);
    assert_eq!(body["time_seconds"], 12.5);

    let (status, _) = send(
        &app,
        Method::POST,
        "/rpg/leaderboard?level_id=2&score=50",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/rpg/leaderboard/2", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
