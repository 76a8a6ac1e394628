use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{api, api::AppState, config::Config, error};

/// Wizard routes in flow order, plus the health check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/refresh-token", get(api::refresh))
        .route("/logout", get(api::logout))
        .route("/playlists", get(api::playlists))
        .route("/tracks", post(api::tracks))
        .route("/filter", post(api::filter))
        .route("/review", get(api::review))
        .route("/save", post(api::save))
        .route("/health", get(api::health))
        .with_state(state)
}

pub async fn serve(config: Arc<Config>) {
    let app = router(AppState::new(Arc::clone(&config)));

    let addr = match SocketAddr::from_str(&config.server_address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
