use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect},
};
use chrono::Utc;

use crate::{
    api::{AppState, resolve_session},
    error::{ApiError, AuthError},
    info,
    session::AuthState,
    utils,
};

pub async fn index() -> Html<&'static str> {
    Html(
        "<h2>mixsift</h2>\
         <p>Filter your playlists by audio features into a new playlist.</p>\
         <p><a href=\"/login\">Log in with Spotify</a></p>",
    )
}

/// Starts a session and sends the browser to the provider's authorize page.
///
/// The signed session cookie is set on this response so the callback can
/// find the session again.
pub async fn login(State(state): State<AppState>) -> impl IntoResponse {
    let handle = utils::generate_session_id();
    state.sessions.create(handle.clone()).await;

    let cookie = utils::session_cookie(&handle, &state.config.session_secret);
    info!("New session, redirecting to provider authorization");

    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&state.auth.authorize_url()),
    )
}

/// OAuth callback: either a `code` to exchange or a provider `error`.
///
/// A provider-reported error is surfaced verbatim without attempting an
/// exchange. On success the token lands in the session and the wizard moves
/// on to playlist selection.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Redirect, ApiError> {
    if let Some(reason) = params.get("error") {
        return Err(AuthError::ProviderDenied(reason.clone()).into());
    }

    let code = params.get("code").ok_or_else(|| {
        ApiError::from(AuthError::ExchangeFailed(
            "callback carried neither code nor error".to_string(),
        ))
    })?;

    let session = resolve_session(&state, &headers).await?;
    let token = state.auth.exchange_code(code).await?;
    session.lock().await.set_token(token);

    Ok(Redirect::to("/playlists"))
}

/// Drops the session and everything in it, token included.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(handle) = utils::session_from_headers(&headers, &state.config.session_secret) {
        state.sessions.remove(&handle).await;
    }
    Redirect::to("/")
}

/// Refresh exchange for an expired access token.
///
/// The session mutex stays held across the exchange, so concurrent refresh
/// attempts for the same session serialize instead of racing. A session
/// whose token is still valid is just sent back to the playlist listing.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let mut guard = session.lock().await;

    match guard.auth_state(Utc::now()) {
        AuthState::Unauthenticated => Err(ApiError::Unauthenticated),
        AuthState::Authenticated => Ok(Redirect::to("/playlists")),
        AuthState::ExpiredPendingRefresh => {
            let refresh_token = guard
                .token
                .as_ref()
                .map(|t| t.refresh_token.clone())
                .unwrap_or_default();

            info!("Access token expired, refreshing");
            let refreshed = state.auth.refresh(&refresh_token).await?;
            guard.update_after_refresh(&refreshed, Utc::now());

            Ok(Redirect::to("/playlists"))
        }
    }
}
