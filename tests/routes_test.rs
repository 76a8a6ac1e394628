use std::sync::Arc;

use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use reqwest::{Url, redirect};
use serde_json::{Value, json};

use mixsift::api::AppState;
use mixsift::config::Config;
use mixsift::server;
use mixsift::types::{TokenRecord, TrackRecord};
use mixsift::utils;

const SECRET: &str = "session-secret";

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn track(id: &str, tempo: Option<f64>) -> TrackRecord {
    TrackRecord {
        track_id: id.to_string(),
        track_name: format!("Track {id}"),
        artist_names: vec!["Artist".to_string()],
        danceability: None,
        energy: None,
        key: None,
        mode: None,
        tempo,
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

/// Mock provider covering the endpoints these tests touch. Only t1 has an
/// audio analysis; lookups for t2 fall through to a 404.
fn provider_router() -> Router {
    Router::new()
        .route(
            "/me/playlists",
            get(|| async {
                Json(json!({
                    "items": [{"id": "p1", "name": "Morning", "tracks": {"total": 2}}]
                }))
            }),
        )
        .route(
            "/playlists/p1/tracks",
            get(|| async {
                Json(json!({
                    "items": [
                        {"track": {"id": "t1", "name": "One", "artists": [{"name": "A"}]}},
                        {"track": {"id": "t2", "name": "Two", "artists": [{"name": "B"}]}}
                    ]
                }))
            }),
        )
        .route(
            "/audio-features/t1",
            get(|| async {
                Json(json!({
                    "danceability": 0.8,
                    "energy": 0.5,
                    "key": 7,
                    "mode": 1,
                    "tempo": 130.0
                }))
            }),
        )
        .route(
            "/api/token",
            post(|| async { Json(json!({"access_token": "a2", "expires_in": 3600})) }),
        )
}

/// Boots a mock provider plus the wizard pointed at it; returns the wizard
/// base URL, its state, and a client that does not follow redirects.
async fn boot() -> (String, AppState, reqwest::Client) {
    let provider = spawn(provider_router()).await;
    let config = Config {
        client_id: "client123".to_string(),
        client_secret: "shhh".to_string(),
        redirect_uri: "http://127.0.0.1:8000/callback".to_string(),
        session_secret: SECRET.to_string(),
        scopes: vec!["user-read-private".to_string()],
        server_address: "127.0.0.1:0".to_string(),
        auth_url: Url::parse("https://accounts.example.com/authorize").unwrap(),
        token_url: format!("{provider}/api/token"),
        api_base_url: provider,
    };

    let state = AppState::new(Arc::new(config));
    let base = spawn(server::router(state.clone())).await;

    let client = reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();
    (base, state, client)
}

/// Registers a session in the store; returns its Cookie header value and
/// its handle for direct state manipulation.
async fn seed_session(state: &AppState, token: Option<TokenRecord>) -> (String, String) {
    let handle = utils::generate_session_id();
    let session = state.sessions.create(handle.clone()).await;
    if let Some(token) = token {
        session.lock().await.set_token(token);
    }

    let cookie = utils::session_cookie(&handle, SECRET)
        .split(';')
        .next()
        .unwrap()
        .to_string();
    (cookie, handle)
}

fn location(response: &reqwest::Response) -> &str {
    response.headers()["location"].to_str().unwrap()
}

#[tokio::test]
async fn test_login_sets_cookie_and_redirects_to_provider() {
    let (base, _state, client) = boot().await;

    let response = client.get(format!("{base}/login")).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert!(location(&response).starts_with("https://accounts.example.com/authorize?"));

    let cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_unauthenticated_listing_redirects_to_login() {
    let (base, _state, client) = boot().await;

    let response = client
        .get(format!("{base}/playlists"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_expired_token_redirects_to_refresh() {
    let (base, state, client) = boot().await;

    // Token obtained at epoch, long expired, refresh token present
    let (cookie, _) = seed_session(
        &state,
        Some(TokenRecord::new(
            "a1".to_string(),
            "r1".to_string(),
            3600,
            at(0),
        )),
    )
    .await;

    let response = client
        .get(format!("{base}/playlists"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/refresh-token");
}

#[tokio::test]
async fn test_refresh_recovers_the_session() {
    let (base, state, client) = boot().await;
    let (cookie, _) = seed_session(
        &state,
        Some(TokenRecord::new(
            "a1".to_string(),
            "r1".to_string(),
            3600,
            at(0),
        )),
    )
    .await;

    let response = client
        .get(format!("{base}/refresh-token"))
        .header("cookie", cookie.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/playlists");

    // The refreshed token now reaches the provider
    let response = client
        .get(format!("{base}/playlists"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let playlists: Value = response.json().await.unwrap();
    assert_eq!(playlists[0]["id"], "p1");
    assert_eq!(playlists[0]["track_count"], 2);
}

#[tokio::test]
async fn test_callback_denial_surfaces_error_body() {
    let (base, _state, client) = boot().await;

    let response = client
        .get(format!("{base}/callback?error=access_denied"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "access_denied");
}

#[tokio::test]
async fn test_filter_and_review_roundtrip() {
    let (base, state, client) = boot().await;
    let (cookie, handle) = seed_session(
        &state,
        Some(TokenRecord::new(
            "tok".to_string(),
            "r1".to_string(),
            3600,
            Utc::now(),
        )),
    )
    .await;

    // Pretend the aggregation step already ran
    let session = state.sessions.get(&handle).await.unwrap();
    session.lock().await.set_aggregate(vec![
        track("t1", Some(130.0)),
        track("t2", Some(150.0)),
        track("t3", None),
    ]);

    let response = client
        .post(format!("{base}/filter"))
        .header("cookie", cookie.clone())
        .form(&[("min_tempo", "120"), ("max_tempo", "140")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/review");

    let response = client
        .get(format!("{base}/review"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let reviewed: Value = response.json().await.unwrap();
    assert_eq!(reviewed.as_array().unwrap().len(), 1);
    assert_eq!(reviewed[0]["track_id"], "t1");
}

#[tokio::test]
async fn test_review_before_filter_is_bad_request() {
    let (base, state, client) = boot().await;
    let (cookie, _) = seed_session(
        &state,
        Some(TokenRecord::new(
            "tok".to_string(),
            "r1".to_string(),
            3600,
            Utc::now(),
        )),
    )
    .await;

    let response = client
        .get(format!("{base}/review"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_health() {
    let (base, _state, client) = boot().await;

    let response = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_logout_invalidates_the_session() {
    let (base, state, client) = boot().await;
    let (cookie, _) = seed_session(
        &state,
        Some(TokenRecord::new(
            "tok".to_string(),
            "r1".to_string(),
            3600,
            Utc::now(),
        )),
    )
    .await;

    let response = client
        .get(format!("{base}/logout"))
        .header("cookie", cookie.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");

    // The old cookie no longer resolves to a session
    let response = client
        .get(format!("{base}/playlists"))
        .header("cookie", cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_tracks_submission_aggregates_and_enriches() {
    let (base, state, client) = boot().await;
    let (cookie, handle) = seed_session(
        &state,
        Some(TokenRecord::new(
            "tok".to_string(),
            "r1".to_string(),
            3600,
            Utc::now(),
        )),
    )
    .await;

    let response = client
        .post(format!("{base}/tracks"))
        .header("cookie", cookie)
        .json(&json!({"playlist_ids": ["p1"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let tracks: Value = response.json().await.unwrap();
    assert_eq!(tracks.as_array().unwrap().len(), 2);
    assert_eq!(tracks[0]["track_id"], "t1");
    assert_eq!(tracks[0]["tempo"], 130.0);
    // No analysis for t2: attributes stay absent, not zero
    assert_eq!(tracks[1]["track_id"], "t2");
    assert!(tracks[1]["tempo"].is_null());

    // The aggregate landed in the session for the filter step
    let session = state.sessions.get(&handle).await.unwrap();
    let guard = session.lock().await;
    assert_eq!(guard.aggregated.as_ref().unwrap().len(), 2);
    assert!(guard.filtered.is_none());
}
